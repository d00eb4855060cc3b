// ABOUTME: Environment-variable server configuration with sensible defaults
// ABOUTME: Ports, artifact paths, telemetry endpoints, and external-call timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server configuration.
//!
//! Environment-only configuration: every knob is an environment variable
//! with a default suitable for local development. No configuration files.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Default HTTP port for the dashboard API
const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default per-external-call timeout in seconds
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default fetch window in days when a request does not specify one
pub const DEFAULT_FETCH_DAYS: u32 = 7;

/// Longest fetch window a request may ask for
pub const MAX_FETCH_DAYS: u32 = 90;

/// Server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP API listens on (`HTTP_PORT`)
    pub http_port: u16,
    /// Directory holding the model artifact JSON files (`MODEL_DIR`)
    pub model_dir: PathBuf,
    /// OAuth client secrets file (`CREDENTIALS_PATH`)
    pub credentials_path: PathBuf,
    /// Stored-token file persisted between runs (`TOKEN_PATH`)
    pub token_path: PathBuf,
    /// Base URL of the fitness telemetry API (`FITNESS_API_BASE`)
    pub fitness_api_base: String,
    /// Timeout applied to every external call (`FETCH_TIMEOUT_SECS`)
    pub fetch_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a numeric variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        let http_port = parse_env("HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let fetch_timeout_secs = parse_env("FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?;

        Ok(Self {
            http_port,
            model_dir: path_env("MODEL_DIR", "models"),
            credentials_path: path_env("CREDENTIALS_PATH", "credentials.json"),
            token_path: path_env("TOKEN_PATH", "token.json"),
            fitness_api_base: env::var("FITNESS_API_BASE")
                .unwrap_or_else(|_| "https://fitness.googleapis.com/fitness/v1".into()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("invalid value for {name}: {raw}"))),
        Err(_) => Ok(default),
    }
}

fn path_env(name: &str, default: &str) -> PathBuf {
    env::var(name).map_or_else(|_| PathBuf::from(default), PathBuf::from)
}
