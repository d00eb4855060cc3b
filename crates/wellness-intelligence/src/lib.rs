// ABOUTME: Wellness intelligence engine covering aggregation, inference, and mining
// ABOUTME: Turns raw telemetry into daily records, predictions, and pattern insights
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Wellness Intelligence
//!
//! The analytical core of the wellness dashboard:
//!
//! - **aggregation**: buckets irregular raw samples into calendar days
//! - **records**: combines per-metric buckets into [`wellness_core::DailyRecord`]s
//! - **features**: derives the fixed-order feature vectors the models consume
//! - **artifacts**: externally trained model parameters loaded from disk
//! - **inference**: runs the clusterer/classifier/regressor over daily records
//! - **recommendations**: goal-aware recommendation text
//! - **patterns**: frequent-pattern mining over goal-achievement flags

/// Daily bucketing of raw telemetry samples
pub mod aggregation;

/// Externally trained model parameters loaded from serde-JSON artifacts
pub mod artifacts;

/// Fixed-order feature vector derivation
pub mod features;

/// Model traits and the per-day inference engine
pub mod inference;

/// Frequent-pattern mining over goal-achievement flags
pub mod patterns;

/// Daily record assembly with forward-filled body metrics
pub mod records;

/// Goal-aware recommendation rule table
pub mod recommendations;

pub use aggregation::{aggregate_daily, AggregationPolicy};
pub use artifacts::{ArtifactError, ModelBundle};
pub use inference::{
    CalorieRegressor, FeatureScaler, InferenceEngine, InferenceError, RiskClassifier,
    WellnessClusterer,
};
pub use patterns::mine_wellness_patterns;
pub use records::{build_daily_records, MetricDailyBuckets};
