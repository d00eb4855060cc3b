// ABOUTME: Model traits and the per-day inference engine producing predictions
// ABOUTME: Skip-and-log batch semantics so one bad day never aborts the whole window
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference adapter.
//!
//! Turns one [`DailyRecord`] plus the current [`Goals`] into one
//! [`Prediction`]. The models are opaque collaborators behind traits; the
//! engine owns the canonical contracts:
//!
//! - clusterer and classifier consume the **scaled** 7-feature wellness
//!   vector;
//! - the regressor consumes the **unscaled** 4-feature calorie vector, and
//!   its output is floored at a minimum plausible daily burn.
//!
//! Batch prediction skips a failing day with a warning and keeps going;
//! only a total absence of records produces an empty result.

use std::collections::HashMap;
use thiserror::Error;
use wellness_core::constants::inference::{MIN_PREDICTED_CALORIES, RISK_PROBABILITY_THRESHOLD};
use wellness_core::{DailyRecord, Goals, Prediction, WellnessCategory};

use crate::artifacts::ModelBundle;
use crate::features::{calorie_features, wellness_features};
use crate::recommendations::personalized_recommendations;

/// Errors raised while running the models over one daily record.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Feature vector length did not match the model's fitted shape
    #[error("feature vector shape mismatch: model expects {expected}, got {actual}")]
    FeatureShape {
        /// Length the model was fitted for
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Model has no parameters to predict with
    #[error("model has no fitted parameters")]
    EmptyModel,

    /// Model produced a probability outside [0, 1]
    #[error("classifier produced an invalid probability: {0}")]
    InvalidProbability(f64),
}

/// Fitted mean/variance normalizer applied before clustering and
/// classification.
pub trait FeatureScaler: Send + Sync {
    /// Scale a feature vector into the space the models were trained in.
    ///
    /// # Errors
    ///
    /// Returns an error when the vector does not match the fitted shape.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Clustering model assigning each day to a wellness cluster.
pub trait WellnessClusterer: Send + Sync {
    /// Predict the cluster id for a scaled wellness vector.
    ///
    /// # Errors
    ///
    /// Returns an error when the vector does not match the fitted shape.
    fn predict(&self, features: &[f64]) -> Result<u32, InferenceError>;
}

/// Binary classifier estimating at-risk probability.
pub trait RiskClassifier: Send + Sync {
    /// Predict `[negative, positive]` class probabilities for a scaled
    /// wellness vector.
    ///
    /// # Errors
    ///
    /// Returns an error when the vector does not match the fitted shape.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError>;
}

/// Regression model estimating daily calorie burn.
pub trait CalorieRegressor: Send + Sync {
    /// Predict calories for an unscaled calorie vector.
    ///
    /// # Errors
    ///
    /// Returns an error when the vector does not match the fitted shape.
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError>;
}

/// Read-only inference context constructed once at process start.
///
/// Holds the scaler, the three models, and the cluster-label mapping; passed
/// by reference into request handling instead of living in module-level
/// state.
pub struct InferenceEngine {
    scaler: Box<dyn FeatureScaler>,
    clusterer: Box<dyn WellnessClusterer>,
    classifier: Box<dyn RiskClassifier>,
    regressor: Box<dyn CalorieRegressor>,
    cluster_labels: HashMap<u32, WellnessCategory>,
}

impl InferenceEngine {
    /// Assemble an engine from individually supplied collaborators.
    #[must_use]
    pub fn new(
        scaler: Box<dyn FeatureScaler>,
        clusterer: Box<dyn WellnessClusterer>,
        classifier: Box<dyn RiskClassifier>,
        regressor: Box<dyn CalorieRegressor>,
        cluster_labels: HashMap<u32, WellnessCategory>,
    ) -> Self {
        Self {
            scaler,
            clusterer,
            classifier,
            regressor,
            cluster_labels,
        }
    }

    /// Assemble an engine from a loaded artifact bundle.
    #[must_use]
    pub fn from_bundle(bundle: ModelBundle) -> Self {
        Self::new(
            Box::new(bundle.scaler),
            Box::new(bundle.clusterer),
            Box::new(bundle.classifier),
            Box::new(bundle.regressor),
            bundle.cluster_labels,
        )
    }

    /// Produce a prediction for one daily record under the current goals.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError`] when a model rejects its feature vector or
    /// produces an out-of-range probability.
    pub fn predict_day(
        &self,
        record: &DailyRecord,
        goals: &Goals,
    ) -> Result<Prediction, InferenceError> {
        let features = wellness_features(record);
        let scaled = self.scaler.transform(&features)?;

        let cluster = self.clusterer.predict(&scaled)?;
        let wellness_category = self
            .cluster_labels
            .get(&cluster)
            .copied()
            .unwrap_or(WellnessCategory::Healthy);

        let proba = self.classifier.predict_proba(&scaled)?;
        let risk_probability = proba[1];
        if !(0.0..=1.0).contains(&risk_probability) {
            return Err(InferenceError::InvalidProbability(risk_probability));
        }
        let is_at_risk = risk_probability > RISK_PROBABILITY_THRESHOLD;

        let raw_calories = self.regressor.predict(&calorie_features(record))?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let predicted_calories = raw_calories.max(MIN_PREDICTED_CALORIES).round() as u32;

        let recommendations =
            personalized_recommendations(record, wellness_category, is_at_risk, goals);

        Ok(Prediction {
            date: record.date,
            wellness_category,
            risk_probability,
            is_at_risk,
            predicted_calories,
            recommendations,
            actual_steps: record.steps,
            actual_calories: record.calories,
            active_minutes: record.active_minutes,
            sleep_minutes: record.sleep_minutes,
            bmi: record.bmi,
        })
    }

    /// Predict every record in the batch, skipping days whose inference
    /// fails. Partial failure is logged, never fatal.
    #[must_use]
    pub fn predict_batch(&self, records: &[DailyRecord], goals: &Goals) -> Vec<Prediction> {
        let mut predictions = Vec::with_capacity(records.len());
        for record in records {
            match self.predict_day(record, goals) {
                Ok(prediction) => predictions.push(prediction),
                Err(error) => {
                    tracing::warn!(date = %record.date, %error, "skipping day: inference failed");
                }
            }
        }
        predictions
    }
}
