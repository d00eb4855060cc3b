// ABOUTME: Unified error handling with standard error codes and HTTP responses
// ABOUTME: Maps the fetch/inference/mining failure taxonomy onto JSON error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling System
//!
//! Centralized error handling for the wellness dashboard server. Defines
//! standard error codes, the [`AppError`] type, and HTTP response formatting
//! so failures surface consistently across every route.
//!
//! The failure taxonomy follows the fetch pipeline: authentication failures
//! abort a fetch; a single metric's failure degrades to "no data" for that
//! metric; only a completely empty fetch window is fatal to the request.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::providers::ProviderError;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// No valid credential could be obtained for the telemetry source
    #[serde(rename = "AUTH_FAILED")]
    AuthFailed,
    /// Request input was invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// The fetch window contained no usable activity data
    #[serde(rename = "NO_FITNESS_DATA")]
    NoFitnessData,
    /// The telemetry source returned an error or timed out
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// Configuration was missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// An unexpected internal error occurred
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> http::StatusCode {
        match self {
            Self::AuthFailed => http::StatusCode::UNAUTHORIZED,
            Self::InvalidInput => http::StatusCode::BAD_REQUEST,
            Self::NoFitnessData => http::StatusCode::NOT_FOUND,
            Self::ExternalServiceError => http::StatusCode::BAD_GATEWAY,
            Self::ConfigError | Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthFailed => "Could not authenticate with the fitness provider",
            Self::InvalidInput => "The provided input is invalid",
            Self::NoFitnessData => "No activity data was found",
            Self::ExternalServiceError => "The fitness provider returned an error",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Authentication with the telemetry source failed
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthFailed, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// The fetch window contained no usable data
    pub fn no_fitness_data(days: u32) -> Self {
        Self::new(
            ErrorCode::NoFitnessData,
            format!("No activity data found for the last {days} days"),
        )
    }

    /// No cached fitness data exists for the session yet
    pub fn no_session_data() -> Self {
        Self::new(
            ErrorCode::NoFitnessData,
            "No fitness data in session. Please fetch data first.",
        )
    }

    /// External service error
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalServiceError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorResponseDetails,
}

/// Body of an HTTP error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        match &error {
            ProviderError::Auth(message) => {
                Self::auth_failed(message.clone()).with_source(error)
            }
            _ => Self::external_service(error.to_string()).with_source(error),
        }
    }
}
