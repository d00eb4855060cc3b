// ABOUTME: Shared server resources threaded through every route handler
// ABOUTME: Bundles config, the inference engine, the telemetry source, and sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared server resources.
//!
//! One [`ServerResources`] is built at startup and cloned (via `Arc`) into
//! every handler. Model artifacts are loaded once; the inference engine and
//! telemetry source are read-only after construction, so no locking is
//! needed around them.

use std::sync::Arc;

use wellness_intelligence::InferenceEngine;

use crate::config::ServerConfig;
use crate::providers::TelemetrySource;
use crate::session::SessionStore;

/// Everything a route handler needs, constructed once at startup.
pub struct ServerResources {
    /// Server configuration
    pub config: ServerConfig,
    /// Loaded model artifacts behind the inference adapter
    pub engine: Arc<InferenceEngine>,
    /// Telemetry source for raw fitness samples
    pub telemetry: Arc<dyn TelemetrySource>,
    /// Per-session dashboard state
    pub sessions: SessionStore,
}

impl ServerResources {
    /// Bundle the startup-constructed resources.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        engine: Arc<InferenceEngine>,
        telemetry: Arc<dyn TelemetrySource>,
    ) -> Self {
        Self {
            config,
            engine,
            telemetry,
            sessions: SessionStore::new(),
        }
    }
}
