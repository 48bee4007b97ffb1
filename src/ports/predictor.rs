//! Predictor Port - The pre-trained regression model.
//!
//! The model itself is opaque: this port only fixes the shape of its input
//! (a feature row) and output (seconds). A `ModelLoader` turns the artifact
//! bytes fetched from storage into a `Predictor`.

use crate::domain::runner::{PredictionError, PredictionInput};

/// A loaded regression model.
pub trait Predictor: Send + Sync {
    /// Predicts the half-marathon finishing time in seconds.
    fn predict(&self, input: &PredictionInput) -> Result<f64, PredictionError>;

    /// Short description for logs (model kind, version).
    fn describe(&self) -> String;
}

/// Deserializes a model artifact into a predictor.
pub trait ModelLoader: Send + Sync {
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn Predictor>, ModelLoadError>;
}

/// Errors from deserializing a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model artifact is not valid: {0}")]
    Malformed(String),

    #[error("unsupported model kind '{0}'")]
    UnsupportedKind(String),

    #[error("model artifact is missing feature '{0}'")]
    MissingFeature(String),
}
