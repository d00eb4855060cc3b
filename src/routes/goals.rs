// ABOUTME: Goal management route handlers for per-session daily targets
// ABOUTME: Setting goals recomputes cached predictions and pattern insights
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Goal management routes.
//!
//! Goals are session-scoped. Setting them replaces the session's targets
//! (missing fields fall back to the documented defaults) and, when fitness
//! data has already been fetched, recomputes predictions and insights so the
//! dashboard immediately reflects the new targets.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use wellness_core::Goals;
use wellness_intelligence::mine_wellness_patterns;

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::session::{session_id_from_header, SESSION_HEADER};

/// Request body for setting goals; omitted fields take the defaults
#[derive(Debug, Deserialize, Default)]
pub struct SetGoalsRequest {
    /// Daily step goal
    #[serde(default)]
    pub steps: Option<u32>,
    /// Daily calorie-burn goal (kcal)
    #[serde(default)]
    pub calories: Option<u32>,
    /// Daily active-minutes goal
    #[serde(default)]
    pub active_minutes: Option<u32>,
    /// Nightly sleep goal in hours
    #[serde(default)]
    pub sleep_hours: Option<f64>,
}

impl SetGoalsRequest {
    fn into_goals(self) -> Goals {
        let defaults = Goals::default();
        Goals {
            steps: self.steps.unwrap_or(defaults.steps),
            calories: self.calories.unwrap_or(defaults.calories),
            active_minutes: self.active_minutes.unwrap_or(defaults.active_minutes),
            sleep_hours: self.sleep_hours.unwrap_or(defaults.sleep_hours),
        }
    }
}

/// Response body after saving goals
#[derive(Debug, Serialize, Deserialize)]
pub struct SetGoalsResponse {
    /// Always `"success"` for a 200 response
    pub status: String,
    /// Confirmation message
    pub message: String,
}

/// Goal management routes
pub struct GoalRoutes;

impl GoalRoutes {
    /// Create the set/get goal routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/set-goals", post(Self::handle_set_goals))
            .route("/api/get-goals", get(Self::handle_get_goals))
            .with_state(resources)
    }

    /// Handle `POST /api/set-goals`
    async fn handle_set_goals(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SetGoalsRequest>,
    ) -> Result<Response, AppError> {
        let goals = request.into_goals();
        if goals.sleep_hours <= 0.0 || !goals.sleep_hours.is_finite() {
            return Err(AppError::invalid_input(
                "sleep_hours must be a positive number",
            ));
        }

        let session_id = session_id_from_header(header_value(&headers));
        let session = resources.sessions.get_or_create(session_id).await;
        let mut state = session.lock().await;

        state.goals = goals;
        info!(%session_id, "goals updated");

        // Cached results reflect the old targets; recompute them in place.
        if state.has_data() {
            state.predictions = resources.engine.predict_batch(&state.records, &state.goals);
            state.insights = mine_wellness_patterns(&state.records, &state.goals);
        }

        let body = SetGoalsResponse {
            status: "success".into(),
            message: "Goals saved successfully!".into(),
        };
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle `GET /api/get-goals`
    async fn handle_get_goals(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Response {
        let session_id = session_id_from_header(header_value(&headers));
        // Reads never create a session; unknown ids see the default goals.
        let goals = match resources.sessions.get(session_id).await {
            Some(session) => session.lock().await.goals,
            None => Goals::default(),
        };
        (StatusCode::OK, Json(goals)).into_response()
    }
}

fn header_value(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}
