// ABOUTME: REST route assembly for the dashboard frontend
// ABOUTME: Merges health, fitness, and goal routers behind tracing and timeout layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST routes.
//!
//! Each endpoint group lives in its own module with a unit struct exposing
//! `routes(...) -> Router`; this module merges them into the server router.

use std::sync::Arc;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use wellness_core::MetricKind;

use crate::context::ServerResources;

/// Fitness data fetch and dashboard endpoints
pub mod fitness;

/// Goal management endpoints
pub mod goals;

/// Health check endpoints
pub mod health;

/// Build the full application router.
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    // A fetch makes one bounded external call per metric, so the inbound
    // timeout must outlast the sum of those calls.
    let request_timeout = resources.config.fetch_timeout * (MetricKind::ALL.len() as u32 + 1);
    Router::new()
        .merge(health::HealthRoutes::routes(resources.clone()))
        .merge(fitness::FitnessRoutes::routes(resources.clone()))
        .merge(goals::GoalRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}
