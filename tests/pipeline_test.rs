// ABOUTME: End-to-end pipeline tests from raw samples through daily records to predictions
// ABOUTME: Pins the feature-vector contracts each model sees during inference
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use wellness_core::{DailyRecord, Goals, MetricKind, RawSample, SampleValue, WellnessCategory};
use wellness_intelligence::{
    aggregate_daily, build_daily_records, AggregationPolicy, CalorieRegressor, FeatureScaler,
    InferenceEngine, InferenceError, MetricDailyBuckets, RiskClassifier, WellnessClusterer,
};

fn nanos(year: i32, month: u32, day: u32, hour: u32) -> i64 {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_nanos_opt()
        .unwrap()
}

fn step_sample(day: u32, hour: u32, steps: i64) -> RawSample {
    RawSample {
        metric: MetricKind::Steps,
        start_nanos: nanos(2024, 3, day, hour),
        end_nanos: None,
        value: SampleValue::Int(steps),
    }
}

fn weight_sample(day: u32, kg: f64) -> RawSample {
    RawSample {
        metric: MetricKind::Weight,
        start_nanos: nanos(2024, 3, day, 9),
        end_nanos: None,
        value: SampleValue::Float(kg),
    }
}

#[test]
fn raw_samples_become_daily_records_with_forward_filled_body_metrics() {
    // Steps on three days; weight measured on day 1 and day 3 only.
    let steps = vec![
        step_sample(1, 8, 3_000),
        step_sample(1, 14, 5_000),
        step_sample(2, 10, 7_000),
        step_sample(3, 11, 4_000),
    ];
    let weight = vec![weight_sample(1, 70.0), weight_sample(3, 68.0)];
    let height = vec![RawSample {
        metric: MetricKind::Height,
        start_nanos: nanos(2024, 3, 1, 9),
        end_nanos: None,
        value: SampleValue::Float(1.75),
    }];

    let buckets = MetricDailyBuckets {
        steps: aggregate_daily(&steps, AggregationPolicy::Sum),
        weight: aggregate_daily(&weight, AggregationPolicy::Mean),
        height: aggregate_daily(&height, AggregationPolicy::Mean),
        ..MetricDailyBuckets::default()
    };

    let records = build_daily_records(&buckets);
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].steps, 8_000);
    assert_eq!(records[1].steps, 7_000);
    assert_eq!(records[2].steps, 4_000);

    assert_eq!(records[0].weight, 70.0);
    assert_eq!(records[0].bmi, 22.86);
    assert_eq!(records[1].weight, 70.0);
    assert_eq!(records[2].weight, 68.0);
    assert_eq!(records[2].bmi, 22.2);
}

#[test]
fn sleep_segments_attribute_to_the_wake_date() {
    // A segment crossing midnight counts toward the morning it ends on.
    let segment = RawSample {
        metric: MetricKind::Sleep,
        start_nanos: nanos(2024, 3, 1, 23),
        end_nanos: Some(nanos(2024, 3, 2, 6)),
        value: SampleValue::Int(4),
    };
    let daily = aggregate_daily(&[segment], AggregationPolicy::SleepIntervalSum);

    let mut expected = BTreeMap::new();
    expected.insert(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), 420.0);
    assert_eq!(daily, expected);
}

struct HalvingScaler;
impl FeatureScaler for HalvingScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        Ok(features.iter().map(|f| f / 2.0).collect())
    }
}

type Seen = Arc<Mutex<Vec<Vec<f64>>>>;

#[derive(Default, Clone)]
struct RecordingClusterer(Seen);
impl WellnessClusterer for RecordingClusterer {
    fn predict(&self, features: &[f64]) -> Result<u32, InferenceError> {
        self.0.lock().unwrap().push(features.to_vec());
        Ok(0)
    }
}

#[derive(Default, Clone)]
struct RecordingClassifier(Seen);
impl RiskClassifier for RecordingClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        self.0.lock().unwrap().push(features.to_vec());
        Ok([0.7, 0.3])
    }
}

#[derive(Default, Clone)]
struct RecordingRegressor(Seen);
impl CalorieRegressor for RecordingRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        self.0.lock().unwrap().push(features.to_vec());
        Ok(2_300.0)
    }
}

fn record() -> DailyRecord {
    DailyRecord {
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        steps: 6_000,
        calories: 2_000,
        active_minutes: 50,
        heart_minutes: 20,
        sleep_minutes: 420,
        weight: 70.0,
        height: 1.75,
        bmi: 22.86,
    }
}

#[test]
fn clusterer_and_classifier_receive_the_scaled_wellness_vector() {
    let clusterer = RecordingClusterer::default();
    let classifier = RecordingClassifier::default();
    let seen_by_clusterer = Arc::clone(&clusterer.0);
    let seen_by_classifier = Arc::clone(&classifier.0);

    let engine = InferenceEngine::new(
        Box::new(HalvingScaler),
        Box::new(clusterer),
        Box::new(classifier),
        Box::new(RecordingRegressor::default()),
        HashMap::from([(0, WellnessCategory::Healthy)]),
    );
    engine.predict_day(&record(), &Goals::default()).unwrap();

    // [steps, total_active, very_active, calories, bmi, ratio, intensity] / 2
    let expected = vec![3_000.0, 25.0, 25.0, 1_000.0, 11.43, 1.5, 0.5];
    assert_eq!(*seen_by_clusterer.lock().unwrap(), vec![expected.clone()]);
    assert_eq!(*seen_by_classifier.lock().unwrap(), vec![expected]);
}

#[test]
fn regressor_receives_the_unscaled_calorie_vector() {
    let regressor = RecordingRegressor::default();
    let seen = Arc::clone(&regressor.0);

    let engine = InferenceEngine::new(
        Box::new(HalvingScaler),
        Box::new(RecordingClusterer::default()),
        Box::new(RecordingClassifier::default()),
        Box::new(regressor),
        HashMap::from([(0, WellnessCategory::Healthy)]),
    );
    engine.predict_day(&record(), &Goals::default()).unwrap();

    // [steps, total_active, very_active, bmi], untouched by the scaler
    assert_eq!(*seen.lock().unwrap(), vec![vec![6_000.0, 50.0, 50.0, 22.86]]);
}

#[test]
fn full_pipeline_produces_one_prediction_per_record() {
    let steps = vec![
        step_sample(1, 8, 9_000),
        step_sample(2, 8, 4_000),
        step_sample(3, 8, 11_000),
    ];
    let buckets = MetricDailyBuckets {
        steps: aggregate_daily(&steps, AggregationPolicy::Sum),
        ..MetricDailyBuckets::default()
    };
    let records = build_daily_records(&buckets);

    let engine = InferenceEngine::new(
        Box::new(HalvingScaler),
        Box::new(RecordingClusterer::default()),
        Box::new(RecordingClassifier::default()),
        Box::new(RecordingRegressor::default()),
        HashMap::from([(0, WellnessCategory::Improving)]),
    );
    let predictions = engine.predict_batch(&records, &Goals::default());

    assert_eq!(predictions.len(), 3);
    for (prediction, record) in predictions.iter().zip(&records) {
        assert_eq!(prediction.date, record.date);
        assert_eq!(prediction.wellness_category, WellnessCategory::Improving);
        assert_eq!(prediction.risk_probability, 0.3);
        assert!(!prediction.is_at_risk);
        assert_eq!(prediction.predicted_calories, 2_300);
        assert!(!prediction.recommendations.is_empty());
    }
}
