//! Prediction input and output shapes.

use serde::Serialize;
use thiserror::Error;

use super::gender::Gender;
use super::record::ValidatedRecord;
use super::time::format_hms;

/// Feature row expected by the regression model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionInput {
    pub age: u8,
    pub gender: Gender,
    pub time_5km_seconds: u32,
}

impl From<&ValidatedRecord> for PredictionInput {
    fn from(record: &ValidatedRecord) -> Self {
        Self {
            age: record.age,
            gender: record.gender,
            time_5km_seconds: record.time_5km_seconds,
        }
    }
}

/// Failures raised while invoking the predictor or reading its output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("model has no coefficient for feature '{0}'")]
    MissingFeature(String),

    #[error("model produced a non-finite duration ({0})")]
    NonFinite(f64),

    #[error("model produced a negative duration ({0}s)")]
    Negative(f64),

    #[error("model failed: {0}")]
    Model(String),
}

/// A predicted finishing time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    /// Raw model output in seconds.
    pub seconds: f64,
    /// `HH:MM:SS` rendering of `seconds`.
    pub formatted: String,
}

impl PredictionOutcome {
    pub fn from_seconds(seconds: f64) -> Result<Self, PredictionError> {
        Ok(Self {
            seconds,
            formatted: format_duration(seconds)?,
        })
    }
}

/// Formats a duration in seconds as `HH:MM:SS`, truncating fractions.
pub fn format_duration(seconds: f64) -> Result<String, PredictionError> {
    if !seconds.is_finite() {
        return Err(PredictionError::NonFinite(seconds));
    }
    if seconds < 0.0 {
        return Err(PredictionError::Negative(seconds));
    }
    Ok(format_hms(seconds.floor() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::runner::time::convert;

    #[test]
    fn formats_whole_seconds() {
        assert_eq!(format_duration(5025.0).unwrap(), "01:23:45");
    }

    #[test]
    fn truncates_fractional_seconds() {
        assert_eq!(format_duration(5025.99).unwrap(), "01:23:45");
    }

    #[test]
    fn formatted_prediction_converts_back() {
        let formatted = format_duration(5025.0).unwrap();
        assert_eq!(convert(&formatted), Some(5025));
    }

    #[test]
    fn rejects_unusable_model_output() {
        assert!(matches!(
            format_duration(f64::NAN),
            Err(PredictionError::NonFinite(_))
        ));
        assert!(matches!(
            format_duration(-1.0),
            Err(PredictionError::Negative(_))
        ));
    }

    #[test]
    fn prediction_input_serializes_feature_names() {
        let record = ValidatedRecord {
            age: 30,
            gender: Gender::Male,
            time_5km_seconds: 1500,
        };
        let json = serde_json::to_value(PredictionInput::from(&record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"age": 30, "gender": "M", "time_5km_seconds": 1500})
        );
    }

    #[test]
    fn outcome_carries_raw_and_formatted_values() {
        let outcome = PredictionOutcome::from_seconds(7384.4).unwrap();
        assert_eq!(outcome.seconds, 7384.4);
        assert_eq!(outcome.formatted, "02:03:04");
    }
}
