// ABOUTME: Fitness data route handlers for fetching telemetry and serving the dashboard
// ABOUTME: Runs the aggregate-predict-mine pipeline and shapes chart-ready JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fitness data routes.
//!
//! `POST /api/fetch-fitness-data` runs the full pipeline: one dataset request
//! per metric, daily aggregation, record building, batch inference, and
//! pattern mining, with the results cached in the caller's session.
//! `GET /api/dashboard-data` serves the cached results as chart-ready JSON.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use wellness_core::{DailyRecord, MetricKind, Prediction};
use wellness_intelligence::{
    aggregate_daily, build_daily_records, mine_wellness_patterns, AggregationPolicy,
    MetricDailyBuckets,
};

use crate::config::{DEFAULT_FETCH_DAYS, MAX_FETCH_DAYS};
use crate::context::ServerResources;
use crate::errors::AppError;
use crate::providers::{ProviderError, TimeRange};
use crate::session::{session_id_from_header, SESSION_HEADER};

/// Query parameters for the fetch endpoint
#[derive(Debug, Deserialize, Default)]
pub struct FetchQuery {
    /// Fetch window in days; defaults when omitted
    #[serde(default)]
    pub days: Option<u32>,
}

/// Response body of a successful fetch
#[derive(Debug, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Always `"success"` for a 200 response
    pub status: String,
    /// Human-readable summary of the fetch
    pub message: String,
    /// Number of daily records produced
    pub data_points: usize,
}

/// Per-day chart series, parallel arrays indexed by day
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartData {
    /// Calendar dates, `YYYY-MM-DD`
    pub dates: Vec<String>,
    /// Daily step totals
    pub steps: Vec<u32>,
    /// Daily calorie totals
    pub calories: Vec<u32>,
    /// Daily active-minute totals
    pub active_minutes: Vec<u32>,
    /// Daily sleep in hours
    pub sleep_hours: Vec<f64>,
    /// Daily BMI values
    pub bmi: Vec<f64>,
}

/// Window-level summary statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of days in the window
    pub total_days: usize,
    /// Mean daily steps
    pub avg_steps: u32,
    /// Mean daily calories
    pub avg_calories: u32,
    /// Mean nightly sleep in hours, 1 decimal
    pub avg_sleep: f64,
    /// Percentage of days not flagged at risk
    pub wellness_score: u32,
    /// Total steps across the window
    pub total_steps: u64,
    /// Total calories across the window
    pub total_calories: u64,
    /// Best single-day step count
    pub max_steps: u32,
    /// Worst single-day step count
    pub min_steps: u32,
}

/// Full dashboard payload
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Parallel per-day chart series
    pub chart_data: ChartData,
    /// Per-day model predictions
    pub predictions: Vec<Prediction>,
    /// Window-level summary statistics
    pub summary: SummaryStats,
    /// The daily records themselves
    pub raw_data: Vec<DailyRecord>,
    /// Mined wellness pattern messages
    pub wellness_patterns: Vec<String>,
}

/// Fitness data routes
pub struct FitnessRoutes;

impl FitnessRoutes {
    /// Create the fetch and dashboard routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/fetch-fitness-data", post(Self::handle_fetch))
            .route("/api/dashboard-data", get(Self::handle_dashboard))
            .with_state(resources)
    }

    /// Handle `POST /api/fetch-fitness-data`
    async fn handle_fetch(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<FetchQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        // A malformed query string gets the same JSON error envelope as
        // every other 400, not the extractor's plain-text rejection.
        let Query(query) = query.map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;
        let days = query.days.unwrap_or(DEFAULT_FETCH_DAYS);
        if days == 0 || days > MAX_FETCH_DAYS {
            return Err(AppError::invalid_input(format!(
                "days must be between 1 and {MAX_FETCH_DAYS}, got {days}"
            )));
        }

        let session_id = session_id_from_header(header_value(&headers));
        let session = resources.sessions.get_or_create(session_id).await;
        // Holding the lock for the whole fetch serializes overlapping
        // fetches within one session.
        let mut state = session.lock().await;

        info!(%session_id, days, "fetching fitness data");
        let range = TimeRange::last_days(days);
        let buckets = fetch_daily_buckets(&resources, &range).await?;

        let records = build_daily_records(&buckets);
        if records.is_empty() {
            return Err(AppError::no_fitness_data(days));
        }

        let predictions = resources.engine.predict_batch(&records, &state.goals);
        let insights = mine_wellness_patterns(&records, &state.goals);

        let data_points = records.len();
        state.records = records;
        state.predictions = predictions;
        state.insights = insights;

        info!(%session_id, data_points, "fetch complete");
        let body = FetchResponse {
            status: "success".into(),
            message: format!("Successfully fetched {data_points} days of fitness data."),
            data_points,
        };
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle `GET /api/dashboard-data`
    async fn handle_dashboard(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let session_id = session_id_from_header(header_value(&headers));
        // A read never creates a session; unknown ids get the same
        // not-found response as a session that has not fetched yet.
        let Some(session) = resources.sessions.get(session_id).await else {
            return Err(AppError::no_session_data());
        };
        let state = session.lock().await;

        if !state.has_data() {
            return Err(AppError::no_session_data());
        }

        let body = DashboardResponse {
            chart_data: chart_data(&state.records),
            predictions: state.predictions.clone(),
            summary: summary_stats(&state.records, &state.predictions),
            raw_data: state.records.clone(),
            wellness_patterns: state.insights.clone(),
        };
        Ok((StatusCode::OK, Json(body)).into_response())
    }
}

fn header_value(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

/// Aggregation policy applied to a metric's raw samples
const fn policy_for(metric: MetricKind) -> AggregationPolicy {
    match metric {
        MetricKind::Weight | MetricKind::Height => AggregationPolicy::Mean,
        MetricKind::Sleep => AggregationPolicy::SleepIntervalSum,
        _ => AggregationPolicy::Sum,
    }
}

/// Fetch and aggregate every metric into daily buckets.
///
/// An authentication failure aborts the whole fetch; any other per-metric
/// failure degrades that metric to an empty map with a warning.
async fn fetch_daily_buckets(
    resources: &ServerResources,
    range: &TimeRange,
) -> Result<MetricDailyBuckets, AppError> {
    let mut buckets = MetricDailyBuckets::default();
    for metric in MetricKind::ALL {
        let samples = match resources.telemetry.fetch_dataset(metric, range).await {
            Ok(samples) => samples,
            Err(error @ ProviderError::Auth(_)) => return Err(error.into()),
            Err(error) => {
                warn!(metric = %metric, %error, "metric fetch failed, continuing without it");
                Vec::new()
            }
        };
        let daily = aggregate_daily(&samples, policy_for(metric));
        match metric {
            MetricKind::Steps => buckets.steps = daily,
            MetricKind::Calories => buckets.calories = daily,
            MetricKind::ActiveMinutes => buckets.active_minutes = daily,
            MetricKind::HeartMinutes => buckets.heart_minutes = daily,
            MetricKind::Weight => buckets.weight = daily,
            MetricKind::Height => buckets.height = daily,
            MetricKind::Sleep => buckets.sleep_minutes = daily,
        }
    }
    Ok(buckets)
}

fn chart_data(records: &[DailyRecord]) -> ChartData {
    ChartData {
        dates: records.iter().map(|r| r.date.to_string()).collect(),
        steps: records.iter().map(|r| r.steps).collect(),
        calories: records.iter().map(|r| r.calories).collect(),
        active_minutes: records.iter().map(|r| r.active_minutes).collect(),
        sleep_hours: records
            .iter()
            .map(|r| f64::from(r.sleep_minutes) / 60.0)
            .collect(),
        bmi: records.iter().map(|r| r.bmi).collect(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn summary_stats(records: &[DailyRecord], predictions: &[Prediction]) -> SummaryStats {
    let total_days = records.len();
    let days = total_days as f64;

    let total_steps: u64 = records.iter().map(|r| u64::from(r.steps)).sum();
    let total_calories: u64 = records.iter().map(|r| u64::from(r.calories)).sum();
    let sleep_hours_sum: f64 = records
        .iter()
        .map(|r| f64::from(r.sleep_minutes) / 60.0)
        .sum();

    let wellness_score = if predictions.is_empty() {
        0
    } else {
        let healthy_days = predictions.iter().filter(|p| !p.is_at_risk).count();
        ((healthy_days as f64 / predictions.len() as f64) * 100.0) as u32
    };

    SummaryStats {
        total_days,
        avg_steps: if total_days == 0 {
            0
        } else {
            (total_steps as f64 / days) as u32
        },
        avg_calories: if total_days == 0 {
            0
        } else {
            (total_calories as f64 / days) as u32
        },
        avg_sleep: if total_days == 0 {
            0.0
        } else {
            ((sleep_hours_sum / days) * 10.0).round() / 10.0
        },
        wellness_score,
        total_steps,
        total_calories,
        max_steps: records.iter().map(|r| r.steps).max().unwrap_or(0),
        min_steps: records.iter().map(|r| r.steps).min().unwrap_or(0),
    }
}
