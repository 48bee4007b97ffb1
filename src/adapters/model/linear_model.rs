//! JSON linear regression model.
//!
//! The published artifact is a small JSON document:
//!
//! ```json
//! {
//!   "kind": "linear",
//!   "version": "2024-05",
//!   "intercept": -120.0,
//!   "coefficients": { "age": 6.0, "time_5km_seconds": 4.55 },
//!   "gender_offsets": { "K": 240.0, "M": 0.0 }
//! }
//! ```
//!
//! prediction = intercept + Σ coefficient × feature + gender offset

use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::runner::{Gender, PredictionError, PredictionInput};
use crate::ports::{ModelLoadError, ModelLoader, Predictor};

const KIND: &str = "linear";
const FEATURE_AGE: &str = "age";
const FEATURE_TIME_5KM: &str = "time_5km_seconds";

/// Serialized form of the model.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModelArtifact {
    pub kind: String,
    #[serde(default)]
    pub version: Option<String>,
    pub intercept: f64,
    pub coefficients: HashMap<String, f64>,
    #[serde(default)]
    pub gender_offsets: HashMap<Gender, f64>,
}

/// A loaded linear model.
#[derive(Debug, Clone)]
pub struct LinearModel {
    version: Option<String>,
    intercept: f64,
    age: f64,
    time_5km_seconds: f64,
    gender_offsets: HashMap<Gender, f64>,
}

impl LinearModel {
    pub fn from_artifact(artifact: LinearModelArtifact) -> Result<Self, ModelLoadError> {
        if artifact.kind != KIND {
            return Err(ModelLoadError::UnsupportedKind(artifact.kind));
        }

        let coefficient = |name: &str| {
            artifact
                .coefficients
                .get(name)
                .copied()
                .ok_or_else(|| ModelLoadError::MissingFeature(name.to_string()))
        };
        let age = coefficient(FEATURE_AGE)?;
        let time_5km_seconds = coefficient(FEATURE_TIME_5KM)?;

        let all_finite = [artifact.intercept, age, time_5km_seconds]
            .iter()
            .chain(artifact.gender_offsets.values())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ModelLoadError::Malformed(
                "model parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            version: artifact.version,
            intercept: artifact.intercept,
            age,
            time_5km_seconds,
            gender_offsets: artifact.gender_offsets,
        })
    }
}

impl Predictor for LinearModel {
    fn predict(&self, input: &PredictionInput) -> Result<f64, PredictionError> {
        let offset = self
            .gender_offsets
            .get(&input.gender)
            .copied()
            .ok_or_else(|| PredictionError::MissingFeature(format!("gender={}", input.gender.code())))?;

        Ok(self.intercept
            + self.age * f64::from(input.age)
            + self.time_5km_seconds * f64::from(input.time_5km_seconds)
            + offset)
    }

    fn describe(&self) -> String {
        match self.version {
            Some(ref version) => format!("linear model {}", version),
            None => "linear model".to_string(),
        }
    }
}

/// Loads `LinearModelArtifact` JSON into a `LinearModel`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinearModelLoader;

impl ModelLoader for JsonLinearModelLoader {
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn Predictor>, ModelLoadError> {
        let artifact: LinearModelArtifact =
            serde_json::from_slice(bytes).map_err(|e| ModelLoadError::Malformed(e.to_string()))?;
        let model = LinearModel::from_artifact(artifact)?;
        tracing::info!(model = %model.describe(), "model artifact loaded");
        Ok(Box::new(model))
    }
}
