//! Model Adapters
//!
//! Implementations of the ModelLoader and Predictor ports.

mod linear_model;

pub use linear_model::{JsonLinearModelLoader, LinearModel, LinearModelArtifact};
