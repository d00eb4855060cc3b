// ABOUTME: Core provider traits for credentials and raw telemetry fetching
// ABOUTME: Shared time-range type and the provider error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core provider traits and interfaces.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wellness_core::{MetricKind, RawSample};

/// Errors raised by credential and telemetry providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No valid credential could be obtained or refreshed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level HTTP failure, including timeouts
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP status returned by the API
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Token store IO failure
    #[error("token store error: {0}")]
    Io(#[from] std::io::Error),

    /// Token or response payload could not be parsed
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// An access credential for the telemetry source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token presented to the API
    pub access_token: String,
    /// Long-lived token used to mint fresh access tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// When the access token stops being accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Whether the access token has passed its expiry
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Whether the credential can be presented as-is
    #[must_use]
    pub fn valid(&self) -> bool {
        !self.access_token.is_empty() && !self.expired()
    }
}

/// Half-open fetch window in provider nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Window start, nanoseconds since the Unix epoch
    pub start_nanos: i64,
    /// Window end, nanoseconds since the Unix epoch
    pub end_nanos: i64,
}

impl TimeRange {
    /// Window covering the last `days` days up to now.
    #[must_use]
    pub fn last_days(days: u32) -> Self {
        let now = Utc::now();
        let start = now - Duration::days(i64::from(days));
        Self {
            start_nanos: start.timestamp_nanos_opt().unwrap_or(0),
            end_nanos: now.timestamp_nanos_opt().unwrap_or(i64::MAX),
        }
    }

    /// Dataset identifier in the provider's `start-end` nanosecond format
    #[must_use]
    pub fn dataset_id(&self) -> String {
        format!("{}-{}", self.start_nanos, self.end_nanos)
    }
}

/// Hands out a usable credential, refreshing or re-reading its backing
/// store as needed.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Obtain a currently valid credential, or `None` when no credential is
    /// available and none can be refreshed.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store or refresh endpoint fails.
    async fn get_credentials(&self) -> ProviderResult<Option<Credential>>;
}

/// Fetches one metric's raw samples from the telemetry source.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch all raw samples for `metric` inside `range`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Auth`] when no valid credential exists, and
    /// transport or API errors otherwise.
    async fn fetch_dataset(
        &self,
        metric: MetricKind,
        range: &TimeRange,
    ) -> ProviderResult<Vec<RawSample>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_validity_tracks_expiry() {
        let mut credential = Credential {
            access_token: "token".into(),
            refresh_token: None,
            expires_at: Some(Utc::now() + Duration::hours(1)),
        };
        assert!(credential.valid());

        credential.expires_at = Some(Utc::now() - Duration::hours(1));
        assert!(credential.expired());
        assert!(!credential.valid());

        credential.expires_at = None;
        assert!(credential.valid());

        credential.access_token.clear();
        assert!(!credential.valid());
    }

    #[test]
    fn time_range_formats_dataset_id() {
        let range = TimeRange {
            start_nanos: 100,
            end_nanos: 200,
        };
        assert_eq!(range.dataset_id(), "100-200");
    }

    #[test]
    fn last_days_spans_the_requested_window() {
        let range = TimeRange::last_days(7);
        let nanos_per_day = 86_400_000_000_000_i64;
        assert_eq!(range.end_nanos - range.start_nanos, 7 * nanos_per_day);
    }
}
