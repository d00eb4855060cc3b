// ABOUTME: Liveness endpoint reporting service identity and session load
// ABOUTME: Single /health route consumed by the dashboard frontend and monitors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health check route.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::context::ServerResources;

/// Health check route
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle `GET /health`
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "active_sessions": resources.sessions.len().await,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}
