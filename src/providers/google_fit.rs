// ABOUTME: Google Fit REST client implementing the telemetry source trait
// ABOUTME: Maps metric kinds to data source ids and parses dataset point payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Fit telemetry client.
//!
//! Each metric maps to one merged data source; a fetch issues
//! `GET {base}/users/me/dataSources/{id}/datasets/{start}-{end}` with a
//! bearer token and converts the returned points into [`RawSample`]s.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use wellness_core::{MetricKind, RawSample, SampleValue};

use super::core::{
    CredentialProvider, ProviderError, ProviderResult, TelemetrySource, TimeRange,
};

/// Merged data source id for a metric kind
#[must_use]
pub const fn data_source_id(metric: MetricKind) -> &'static str {
    match metric {
        MetricKind::Steps => {
            "derived:com.google.step_count.delta:com.google.android.gms:merge_step_deltas"
        }
        MetricKind::Calories => {
            "derived:com.google.calories.expended:com.google.android.gms:merge_calories_expended"
        }
        MetricKind::ActiveMinutes => {
            "derived:com.google.active_minutes:com.google.android.gms:merge_active_minutes"
        }
        MetricKind::HeartMinutes => {
            "derived:com.google.heart_minutes:com.google.android.gms:merge_heart_minutes"
        }
        MetricKind::Weight => "derived:com.google.weight:com.google.android.gms:merge_weight",
        MetricKind::Height => "derived:com.google.height:com.google.android.gms:merge_height",
        MetricKind::Sleep => "derived:com.google.sleep.segment:com.google.android.gms:merged",
    }
}

/// Dataset response body, reduced to the fields the pipeline consumes
#[derive(Debug, Deserialize)]
struct DatasetResponse {
    #[serde(default)]
    point: Vec<DataPoint>,
}

/// One point in a dataset response; nano timestamps arrive as strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataPoint {
    start_time_nanos: String,
    #[serde(default)]
    end_time_nanos: Option<String>,
    #[serde(default)]
    value: Vec<PointValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointValue {
    #[serde(default)]
    int_val: Option<i64>,
    #[serde(default)]
    fp_val: Option<f64>,
}

impl DataPoint {
    fn into_sample(self, metric: MetricKind) -> Option<RawSample> {
        let start_nanos = self.start_time_nanos.parse().ok()?;
        let end_nanos = self
            .end_time_nanos
            .as_deref()
            .and_then(|raw| raw.parse().ok());
        let value = self.value.first().and_then(|v| match (v.int_val, v.fp_val) {
            (Some(int), _) => Some(SampleValue::Int(int)),
            (None, Some(fp)) => Some(SampleValue::Float(fp)),
            (None, None) => None,
        })?;
        Some(RawSample {
            metric,
            start_nanos,
            end_nanos,
            value,
        })
    }
}

/// REST client for the Google Fit datasets API.
pub struct GoogleFitClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl GoogleFitClient {
    /// Create a client against `base_url` using `credentials` for auth.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
        }
    }

    fn dataset_url(&self, metric: MetricKind, range: &TimeRange) -> String {
        format!(
            "{}/users/me/dataSources/{}/datasets/{}",
            self.base_url,
            data_source_id(metric),
            range.dataset_id()
        )
    }
}

#[async_trait]
impl TelemetrySource for GoogleFitClient {
    async fn fetch_dataset(
        &self,
        metric: MetricKind,
        range: &TimeRange,
    ) -> ProviderResult<Vec<RawSample>> {
        let credential = self
            .credentials
            .get_credentials()
            .await?
            .ok_or_else(|| ProviderError::Auth("no valid credential available".into()))?;

        let url = self.dataset_url(metric, range);
        debug!(metric = %metric, "fetching dataset");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&credential.access_token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::Auth(format!(
                "dataset request for {metric} rejected with status {status}"
            )));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: DatasetResponse = response.json().await?;
        let total = body.point.len();
        let samples: Vec<RawSample> = body
            .point
            .into_iter()
            .filter_map(|point| point.into_sample(metric))
            .collect();
        if samples.len() < total {
            warn!(
                metric = %metric,
                dropped = total - samples.len(),
                "dropped malformed points from dataset"
            );
        }
        debug!(metric = %metric, samples = samples.len(), "dataset fetched");
        Ok(samples)
    }
}
