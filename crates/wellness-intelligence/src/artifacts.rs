// ABOUTME: Externally trained model parameters loaded from serde-JSON artifact files
// ABOUTME: Standard scaler, k-means centroids, logistic classifier, and linear regressor
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model artifacts.
//!
//! The models are trained offline; this module only loads their fitted
//! parameters and evaluates them. Each artifact is a small JSON file in the
//! configured model directory:
//!
//! - `feature_scaler.json` — per-feature mean and scale
//! - `wellness_clusters.json` — k-means centroids in scaled feature space
//! - `risk_classifier.json` — logistic-regression coefficients
//! - `calorie_regressor.json` — linear-regression coefficients
//! - `cluster_labels.json` — cluster id to wellness category mapping
//!
//! Vector shapes are validated at load time so inference never has to.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use wellness_core::WellnessCategory;

use crate::features::{CALORIE_FEATURE_COUNT, WELLNESS_FEATURE_COUNT};
use crate::inference::{
    CalorieRegressor, FeatureScaler, InferenceError, RiskClassifier, WellnessClusterer,
};

/// Errors raised while loading model artifacts at startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Artifact file could not be read
    #[error("failed to read model artifact {name}: {source}")]
    Io {
        /// Artifact file name
        name: &'static str,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Artifact file contained invalid JSON
    #[error("failed to parse model artifact {name}: {source}")]
    Parse {
        /// Artifact file name
        name: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Parameter vector had the wrong length for its model contract
    #[error("model artifact {name} has invalid shape: expected {expected}, got {actual}")]
    Shape {
        /// Artifact file name
        name: &'static str,
        /// Expected vector length
        expected: usize,
        /// Actual vector length
        actual: usize,
    },
}

/// Fitted mean/variance normalizer for the wellness feature vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature means subtracted before scaling
    pub mean: Vec<f64>,
    /// Per-feature standard deviations divided after centering
    pub scale: Vec<f64>,
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.mean.len() {
            return Err(InferenceError::FeatureShape {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                if *scale == 0.0 {
                    0.0
                } else {
                    (x - mean) / scale
                }
            })
            .collect())
    }
}

/// K-means centroids in scaled feature space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansCentroids {
    /// One centroid per cluster, each the length of the wellness vector
    pub centroids: Vec<Vec<f64>>,
}

impl WellnessClusterer for KMeansCentroids {
    fn predict(&self, features: &[f64]) -> Result<u32, InferenceError> {
        let mut best: Option<(u32, f64)> = None;
        for (id, centroid) in self.centroids.iter().enumerate() {
            if centroid.len() != features.len() {
                return Err(InferenceError::FeatureShape {
                    expected: centroid.len(),
                    actual: features.len(),
                });
            }
            let distance: f64 = centroid
                .iter()
                .zip(features)
                .map(|(c, x)| (c - x) * (c - x))
                .sum();
            #[allow(clippy::cast_possible_truncation)]
            let id = id as u32;
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((id, distance)),
            }
        }
        best.map(|(id, _)| id).ok_or(InferenceError::EmptyModel)
    }
}

/// Logistic-regression risk classifier over the scaled wellness vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Per-feature coefficients
    pub coefficients: Vec<f64>,
    /// Bias term
    pub intercept: f64,
}

impl RiskClassifier for LogisticModel {
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        let logit = dot(&self.coefficients, features, self.intercept)?;
        let positive = 1.0 / (1.0 + (-logit).exp());
        Ok([1.0 - positive, positive])
    }
}

/// Linear-regression calorie estimator over the unscaled calorie vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// Per-feature coefficients
    pub coefficients: Vec<f64>,
    /// Bias term
    pub intercept: f64,
}

impl CalorieRegressor for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        dot(&self.coefficients, features, self.intercept)
    }
}

fn dot(coefficients: &[f64], features: &[f64], intercept: f64) -> Result<f64, InferenceError> {
    if coefficients.len() != features.len() {
        return Err(InferenceError::FeatureShape {
            expected: coefficients.len(),
            actual: features.len(),
        });
    }
    Ok(coefficients
        .iter()
        .zip(features)
        .map(|(c, x)| c * x)
        .sum::<f64>()
        + intercept)
}

/// The full set of artifacts the inference engine needs, loaded once at
/// process start and treated as read-only afterwards.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    /// Fitted feature scaler
    pub scaler: StandardScaler,
    /// Clustering model
    pub clusterer: KMeansCentroids,
    /// Risk classifier
    pub classifier: LogisticModel,
    /// Calorie regressor
    pub regressor: LinearModel,
    /// Cluster id to wellness category mapping
    pub cluster_labels: HashMap<u32, WellnessCategory>,
}

impl ModelBundle {
    /// Load all artifacts from `dir`, validating vector shapes.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] when a file is missing, unparseable, or a
    /// parameter vector does not match its model's feature contract.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let scaler: StandardScaler = load_json(dir, "feature_scaler.json")?;
        let clusterer: KMeansCentroids = load_json(dir, "wellness_clusters.json")?;
        let classifier: LogisticModel = load_json(dir, "risk_classifier.json")?;
        let regressor: LinearModel = load_json(dir, "calorie_regressor.json")?;
        let cluster_labels: HashMap<u32, WellnessCategory> =
            load_json(dir, "cluster_labels.json")?;

        check_shape("feature_scaler.json", scaler.mean.len())?;
        check_shape("feature_scaler.json", scaler.scale.len())?;
        for centroid in &clusterer.centroids {
            check_shape("wellness_clusters.json", centroid.len())?;
        }
        check_shape("risk_classifier.json", classifier.coefficients.len())?;
        if regressor.coefficients.len() != CALORIE_FEATURE_COUNT {
            return Err(ArtifactError::Shape {
                name: "calorie_regressor.json",
                expected: CALORIE_FEATURE_COUNT,
                actual: regressor.coefficients.len(),
            });
        }

        Ok(Self {
            scaler,
            clusterer,
            classifier,
            regressor,
            cluster_labels,
        })
    }
}

fn load_json<T: serde::de::DeserializeOwned>(
    dir: &Path,
    name: &'static str,
) -> Result<T, ArtifactError> {
    let contents =
        std::fs::read_to_string(dir.join(name)).map_err(|source| ArtifactError::Io {
            name,
            source,
        })?;
    serde_json::from_str(&contents).map_err(|source| ArtifactError::Parse { name, source })
}

fn check_shape(name: &'static str, actual: usize) -> Result<(), ArtifactError> {
    if actual == WELLNESS_FEATURE_COUNT {
        Ok(())
    } else {
        Err(ArtifactError::Shape {
            name,
            expected: WELLNESS_FEATURE_COUNT,
            actual,
        })
    }
}
