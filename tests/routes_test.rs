// ABOUTME: HTTP-level tests driving the router with stubbed telemetry and models
// ABOUTME: Covers the fetch pipeline, dashboard payloads, goals, and error responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::NaiveDate;
use tower::ServiceExt;
use uuid::Uuid;

use wellness_core::{Goals, MetricKind, RawSample, SampleValue, WellnessCategory};
use wellness_dashboard::{
    config::ServerConfig,
    context::ServerResources,
    providers::{ProviderError, ProviderResult, TelemetrySource, TimeRange},
    routes,
};
use wellness_intelligence::{
    CalorieRegressor, FeatureScaler, InferenceEngine, InferenceError, RiskClassifier,
    WellnessClusterer,
};

fn nanos(day: u32, hour: u32) -> i64 {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_nanos_opt()
        .unwrap()
}

fn step_sample(day: u32, steps: i64) -> RawSample {
    RawSample {
        metric: MetricKind::Steps,
        start_nanos: nanos(day, 9),
        end_nanos: None,
        value: SampleValue::Int(steps),
    }
}

fn sleep_sample(day: u32, minutes: i64) -> RawSample {
    RawSample {
        metric: MetricKind::Sleep,
        start_nanos: nanos(day, 0),
        end_nanos: Some(nanos(day, 0) + minutes * 60 * 1_000_000_000),
        value: SampleValue::Int(4),
    }
}

/// Stub telemetry serving canned samples per metric.
#[derive(Default)]
struct StubTelemetry {
    samples: HashMap<MetricKind, Vec<RawSample>>,
    auth_failure: bool,
    failing_metrics: Vec<MetricKind>,
}

#[async_trait]
impl TelemetrySource for StubTelemetry {
    async fn fetch_dataset(
        &self,
        metric: MetricKind,
        _range: &TimeRange,
    ) -> ProviderResult<Vec<RawSample>> {
        if self.auth_failure {
            return Err(ProviderError::Auth("no valid credential".into()));
        }
        if self.failing_metrics.contains(&metric) {
            return Err(ProviderError::Api {
                status: 503,
                message: "service unavailable".into(),
            });
        }
        Ok(self.samples.get(&metric).cloned().unwrap_or_default())
    }
}

struct IdentityScaler;
impl FeatureScaler for IdentityScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        Ok(features.to_vec())
    }
}

struct FixedClusterer;
impl WellnessClusterer for FixedClusterer {
    fn predict(&self, _features: &[f64]) -> Result<u32, InferenceError> {
        Ok(0)
    }
}

struct FixedClassifier;
impl RiskClassifier for FixedClassifier {
    fn predict_proba(&self, _features: &[f64]) -> Result<[f64; 2], InferenceError> {
        Ok([0.8, 0.2])
    }
}

struct FixedRegressor;
impl CalorieRegressor for FixedRegressor {
    fn predict(&self, _features: &[f64]) -> Result<f64, InferenceError> {
        Ok(2_200.0)
    }
}

fn stub_engine() -> Arc<InferenceEngine> {
    Arc::new(InferenceEngine::new(
        Box::new(IdentityScaler),
        Box::new(FixedClusterer),
        Box::new(FixedClassifier),
        Box::new(FixedRegressor),
        HashMap::from([(0, WellnessCategory::Healthy)]),
    ))
}

fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        model_dir: PathBuf::from("models"),
        credentials_path: PathBuf::from("credentials.json"),
        token_path: PathBuf::from("token.json"),
        fitness_api_base: "http://localhost".into(),
        fetch_timeout: Duration::from_secs(5),
    }
}

fn app_with_resources(telemetry: StubTelemetry) -> (axum::Router, Arc<ServerResources>) {
    let resources = Arc::new(ServerResources::new(
        test_config(),
        stub_engine(),
        Arc::new(telemetry),
    ));
    (routes::router(resources.clone()), resources)
}

fn app(telemetry: StubTelemetry) -> axum::Router {
    app_with_resources(telemetry).0
}

fn three_day_telemetry() -> StubTelemetry {
    let mut samples = HashMap::new();
    samples.insert(
        MetricKind::Steps,
        vec![
            step_sample(1, 11_000),
            step_sample(2, 4_000),
            step_sample(3, 9_000),
        ],
    );
    samples.insert(
        MetricKind::Sleep,
        vec![sleep_sample(1, 420), sleep_sample(2, 390), sleep_sample(3, 450)],
    );
    StubTelemetry {
        samples,
        ..StubTelemetry::default()
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let response = app(StubTelemetry::default())
        .oneshot(get("/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "wellness_dashboard");
    assert_eq!(json["active_sessions"], 0);
}

#[tokio::test]
async fn fetch_then_dashboard_round_trip() {
    let router = app(three_day_telemetry());

    let response = router
        .clone()
        .oneshot(post("/api/fetch-fitness-data?days=7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["data_points"], 3);

    let response = router.oneshot(get("/api/dashboard-data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(
        json["chart_data"]["dates"],
        serde_json::json!(["2024-03-01", "2024-03-02", "2024-03-03"])
    );
    assert_eq!(
        json["chart_data"]["steps"],
        serde_json::json!([11_000, 4_000, 9_000])
    );
    assert_eq!(json["summary"]["total_days"], 3);
    assert_eq!(json["summary"]["avg_steps"], 8_000);
    assert_eq!(json["summary"]["max_steps"], 11_000);
    // Stub classifier keeps every day below the risk threshold.
    assert_eq!(json["summary"]["wellness_score"], 100);
    assert_eq!(json["predictions"].as_array().unwrap().len(), 3);
    assert_eq!(json["raw_data"].as_array().unwrap().len(), 3);
    assert!(json["wellness_patterns"].is_array());
}

#[tokio::test]
async fn dashboard_without_fetch_is_not_found() {
    let response = app(StubTelemetry::default())
        .oneshot(get("/api/dashboard-data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NO_FITNESS_DATA");
}

#[tokio::test]
async fn empty_fetch_window_is_not_found() {
    let response = app(StubTelemetry::default())
        .oneshot(post("/api/fetch-fitness-data?days=7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NO_FITNESS_DATA");
}

#[tokio::test]
async fn invalid_days_is_rejected() {
    let router = app(three_day_telemetry());

    let response = router
        .clone()
        .oneshot(post("/api/fetch-fitness-data?days=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(post("/api/fetch-fitness-data?days=365"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn non_numeric_days_gets_the_json_error_envelope() {
    let response = app(three_day_telemetry())
        .oneshot(post("/api/fetch-fitness-data?days=soon"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn read_requests_do_not_create_sessions() {
    let (router, resources) = app_with_resources(StubTelemetry::default());

    let request = Request::builder()
        .uri("/api/dashboard-data")
        .header("x-session-id", Uuid::new_v4().to_string())
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = Request::builder()
        .uri("/api/get-goals")
        .header("x-session-id", Uuid::new_v4().to_string())
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let goals: Goals = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(goals, Goals::default());

    assert!(resources.sessions.is_empty().await);
}

#[tokio::test]
async fn auth_failure_aborts_the_fetch() {
    let telemetry = StubTelemetry {
        auth_failure: true,
        ..StubTelemetry::default()
    };
    let response = app(telemetry)
        .oneshot(post("/api/fetch-fitness-data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "AUTH_FAILED");
}

#[tokio::test]
async fn single_metric_failure_degrades_to_zero() {
    let mut telemetry = three_day_telemetry();
    telemetry.failing_metrics = vec![MetricKind::Calories];

    let router = app(telemetry);
    let response = router
        .clone()
        .oneshot(post("/api/fetch-fitness-data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.oneshot(get("/api/dashboard-data")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(
        json["chart_data"]["calories"],
        serde_json::json!([0, 0, 0])
    );
}

#[tokio::test]
async fn goals_round_trip_with_defaults() {
    let router = app(StubTelemetry::default());

    let response = router.clone().oneshot(get("/api/get-goals")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let goals: Goals = serde_json::from_value(json).unwrap();
    assert_eq!(goals, Goals::default());

    let request = Request::builder()
        .method("POST")
        .uri("/api/set-goals")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"steps": 12000, "sleep_hours": 8.0}"#))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");

    let response = router.oneshot(get("/api/get-goals")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["steps"], 12_000);
    assert_eq!(json["calories"], 2_500);
    assert_eq!(json["sleep_hours"], 8.0);
}

#[tokio::test]
async fn setting_goals_recomputes_cached_recommendations() {
    let router = app(three_day_telemetry());

    router
        .clone()
        .oneshot(post("/api/fetch-fitness-data"))
        .await
        .unwrap();

    // Day 2 walked 4000 steps: behind a 10000-step goal, ahead of 2000.
    let response = router.clone().oneshot(get("/api/dashboard-data")).await.unwrap();
    let json = body_json(response).await;
    let before = json["predictions"][1]["recommendations"].to_string();
    assert!(before.contains("40%"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/set-goals")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"steps": 2000}"#))
        .unwrap();
    router.clone().oneshot(request).await.unwrap();

    let response = router.oneshot(get("/api/dashboard-data")).await.unwrap();
    let json = body_json(response).await;
    let after = json["predictions"][1]["recommendations"].to_string();
    assert!(!after.contains("40%"));
}

#[tokio::test]
async fn sessions_are_isolated_by_header() {
    let router = app(three_day_telemetry());
    let session_a = Uuid::new_v4();
    let session_b = Uuid::new_v4();

    let request = Request::builder()
        .method("POST")
        .uri("/api/fetch-fitness-data")
        .header("x-session-id", session_a.to_string())
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/api/dashboard-data")
        .header("x-session-id", session_b.to_string())
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = Request::builder()
        .uri("/api/dashboard-data")
        .header("x-session-id", session_a.to_string())
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
