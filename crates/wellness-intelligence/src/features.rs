// ABOUTME: Derived per-day quantities and fixed-order feature vectors for model input
// ABOUTME: Canonical 7-feature wellness vector and 4-feature calorie regressor vector
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature derivation.
//!
//! The models consume fixed-order numeric vectors assembled here. There are
//! two canonical shapes:
//!
//! - the **wellness vector** (7 features) feeds the clusterer and the
//!   classifier, after scaling;
//! - the **calorie vector** (4 features) feeds the regressor, unscaled.
//!
//! The calorie vector deliberately carries BMI rather than actual calories:
//! feeding the regression target back in as a feature would make the
//! estimate circular.

use wellness_core::constants::features::{
    FALLBACK_BMI, FALLBACK_CALORIES, STEPS_PER_VERY_ACTIVE_MINUTE,
};
use wellness_core::DailyRecord;

/// Length of the wellness vector consumed by the clusterer and classifier
pub const WELLNESS_FEATURE_COUNT: usize = 7;

/// Length of the calorie vector consumed by the regressor
pub const CALORIE_FEATURE_COUNT: usize = 4;

/// Quantities derived from one daily record, shared by the feature vectors
/// and the recommendation rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    /// Active minutes floored at 1 to avoid downstream zero division
    pub total_active_minutes: u32,
    /// Heuristic high-intensity minutes derived from step count
    pub very_active_minutes: u32,
    /// Steps per calorie burned
    pub step_calorie_ratio: f64,
    /// Fraction of active minutes spent at high intensity
    pub activity_intensity: f64,
}

impl DerivedFeatures {
    /// Derive the shared quantities from one daily record.
    #[must_use]
    pub fn from_record(record: &DailyRecord) -> Self {
        let total_active_minutes = record.active_minutes.max(1);
        let very_active_minutes =
            (record.steps / STEPS_PER_VERY_ACTIVE_MINUTE).min(total_active_minutes);
        let step_calorie_ratio = f64::from(record.steps) / f64::from(record.calories.max(1));
        let activity_intensity =
            f64::from(very_active_minutes) / f64::from(total_active_minutes.max(1));
        Self {
            total_active_minutes,
            very_active_minutes,
            step_calorie_ratio,
            activity_intensity,
        }
    }
}

/// Assemble the 7-feature wellness vector in canonical order:
/// `[steps, total_active_minutes, very_active_minutes, calories, bmi,
/// step_calorie_ratio, activity_intensity]`.
///
/// A zero calorie total or non-positive BMI is a data gap, not a reading;
/// both are substituted with the training-time fallbacks.
#[must_use]
pub fn wellness_features(record: &DailyRecord) -> [f64; WELLNESS_FEATURE_COUNT] {
    let derived = DerivedFeatures::from_record(record);
    [
        f64::from(record.steps),
        f64::from(derived.total_active_minutes),
        f64::from(derived.very_active_minutes),
        calories_feature(record),
        bmi_feature(record),
        derived.step_calorie_ratio,
        derived.activity_intensity,
    ]
}

/// Assemble the 4-feature calorie vector in canonical order:
/// `[steps, total_active_minutes, very_active_minutes, bmi]`.
#[must_use]
pub fn calorie_features(record: &DailyRecord) -> [f64; CALORIE_FEATURE_COUNT] {
    let derived = DerivedFeatures::from_record(record);
    [
        f64::from(record.steps),
        f64::from(derived.total_active_minutes),
        f64::from(derived.very_active_minutes),
        bmi_feature(record),
    ]
}

fn calories_feature(record: &DailyRecord) -> f64 {
    if record.calories == 0 {
        FALLBACK_CALORIES
    } else {
        f64::from(record.calories)
    }
}

fn bmi_feature(record: &DailyRecord) -> f64 {
    if record.bmi > 0.0 {
        record.bmi
    } else {
        FALLBACK_BMI
    }
}
