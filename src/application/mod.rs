//! Application layer - orchestration of the prediction pipeline.
//!
//! Coordinates the domain with the ports: extraction through the language
//! model, validation, and prediction with the loaded model.

pub mod bootstrap;
pub mod extract_profile;
pub mod predict_finish_time;
pub mod session;

pub use bootstrap::{load_predictor, ExternalServiceError};
pub use extract_profile::{Extraction, ExtractionError, ProfileExtractor, EXTRACT_OPERATION};
pub use predict_finish_time::{
    PipelineError, PredictFinishTimeCommand, PredictFinishTimeHandler, PredictFinishTimeResult,
};
pub use session::Session;
