// ABOUTME: Domain models for raw telemetry, daily summaries, goals, and predictions
// ABOUTME: Strongly typed replacements for the loosely keyed record maps of the source feed
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core data models for the wellness dashboard.
//!
//! Raw samples arrive from the telemetry provider, get aggregated into one
//! [`DailyRecord`] per calendar date, and flow through the inference adapter
//! to become [`Prediction`]s. All defaulting rules live on the types instead
//! of being scattered through the pipeline as inline lookups.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::goal_defaults;

/// The metric a raw sample belongs to.
///
/// One telemetry fetch issues one dataset request per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Step count deltas
    Steps,
    /// Calories expended
    Calories,
    /// Active minutes
    ActiveMinutes,
    /// Heart points / heart minutes
    HeartMinutes,
    /// Body weight readings (kg)
    Weight,
    /// Height readings (m)
    Height,
    /// Sleep stage segments
    Sleep,
}

impl MetricKind {
    /// All metric kinds fetched per telemetry request, in fetch order.
    pub const ALL: [Self; 7] = [
        Self::Steps,
        Self::Calories,
        Self::ActiveMinutes,
        Self::HeartMinutes,
        Self::Weight,
        Self::Height,
        Self::Sleep,
    ];

    /// Stable lowercase name used in logs and config keys
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::Calories => "calories",
            Self::ActiveMinutes => "active_minutes",
            Self::HeartMinutes => "heart_minutes",
            Self::Weight => "weight",
            Self::Height => "height",
            Self::Sleep => "sleep",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric payload of a raw sample, tagged with its wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleValue {
    /// Integer-encoded value (step counts, stage codes)
    Int(i64),
    /// Floating-point value (calories, weight, height)
    Float(f64),
}

impl SampleValue {
    /// Numeric value regardless of wire encoding
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Integer value when the sample was integer-encoded
    #[must_use]
    pub const fn as_int(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(_) => None,
        }
    }
}

/// One point-in-time or interval reading for a single metric.
///
/// Immutable once fetched; timestamps are provider nanoseconds since the
/// Unix epoch. Interval metrics (sleep segments) carry an end timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Metric this sample belongs to
    pub metric: MetricKind,
    /// Start of the reading, nanoseconds since the Unix epoch
    pub start_nanos: i64,
    /// End of the reading for interval metrics, nanoseconds since the Unix epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_nanos: Option<i64>,
    /// Numeric payload tagged with its encoding
    pub value: SampleValue,
}

impl RawSample {
    /// Start of the reading as a UTC timestamp
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.start_nanos)
    }

    /// End of the reading as a UTC timestamp, for interval metrics
    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_nanos.map(DateTime::from_timestamp_nanos)
    }
}

/// One calendar date's aggregated wellness summary.
///
/// Exactly one record exists per date in the fetch window. Activity metrics
/// default to zero when their raw feed was empty; weight and height are
/// forward-filled from the most recent direct sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date (UTC), serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Total steps for the day
    pub steps: u32,
    /// Total calories expended (kcal)
    pub calories: u32,
    /// Total active minutes
    pub active_minutes: u32,
    /// Total heart minutes
    pub heart_minutes: u32,
    /// Total sleep across recognized sleep stages (minutes)
    pub sleep_minutes: u32,
    /// Body weight in kg, forward-filled, 1 decimal
    pub weight: f64,
    /// Height in m, forward-filled, 2 decimals
    pub height: f64,
    /// Body mass index, 2 decimals; 0.0 when height is unusable
    pub bmi: f64,
}

/// User-configurable daily targets, scoped to one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    /// Daily step goal
    pub steps: u32,
    /// Daily calorie-burn goal (kcal)
    pub calories: u32,
    /// Daily active-minutes goal
    pub active_minutes: u32,
    /// Nightly sleep goal in hours
    pub sleep_hours: f64,
}

impl Goals {
    /// Sleep goal expressed in minutes
    #[must_use]
    pub fn sleep_goal_minutes(&self) -> f64 {
        self.sleep_hours * 60.0
    }
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            steps: goal_defaults::STEPS,
            calories: goal_defaults::CALORIES,
            active_minutes: goal_defaults::ACTIVE_MINUTES,
            sleep_hours: goal_defaults::SLEEP_HOURS,
        }
    }
}

/// Closed set of wellness labels produced by the clustering model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WellnessCategory {
    /// Metrics suggest elevated health risk
    #[serde(rename = "At Risk")]
    AtRisk,
    /// Metrics trending upward but below healthy baselines
    #[serde(rename = "Improving")]
    Improving,
    /// Metrics within healthy baselines
    #[serde(rename = "Healthy")]
    Healthy,
    /// Metrics well above healthy baselines
    #[serde(rename = "High Performance")]
    HighPerformance,
}

impl WellnessCategory {
    /// Human-readable label used in dashboards and recommendations
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AtRisk => "At Risk",
            Self::Improving => "Improving",
            Self::Healthy => "Healthy",
            Self::HighPerformance => "High Performance",
        }
    }
}

impl std::fmt::Display for WellnessCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Model outputs and recommendations for one daily record.
///
/// Recreated on every fetch or goal change; never persisted beyond the
/// session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Date the prediction covers
    pub date: NaiveDate,
    /// Cluster-derived wellness label
    pub wellness_category: WellnessCategory,
    /// Classifier positive-class probability in [0, 1]
    pub risk_probability: f64,
    /// Whether the risk probability crossed the at-risk threshold
    pub is_at_risk: bool,
    /// Regressor calorie estimate (kcal)
    pub predicted_calories: u32,
    /// Goal-aware recommendation messages in deterministic order
    pub recommendations: Vec<String>,
    /// Actual steps that fed the prediction
    pub actual_steps: u32,
    /// Actual calories that fed the prediction
    pub actual_calories: u32,
    /// Actual active minutes that fed the prediction
    pub active_minutes: u32,
    /// Actual sleep minutes that fed the prediction
    pub sleep_minutes: u32,
    /// BMI that fed the prediction
    pub bmi: f64,
}
