//! PredictFinishTimeHandler - text in, predicted half-marathon time out.
//!
//! Runs the whole pipeline in order: extraction, time conversion,
//! validation and, only when nothing is missing, prediction.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::extract_profile::{ExtractionError, ProfileExtractor};
use crate::domain::runner::{
    into_validated, ConvertedRecord, PredictionError, PredictionInput, PredictionOutcome,
    UserRecord, ValidationAggregateError,
};
use crate::ports::Predictor;

/// Command to predict a finishing time from free text.
#[derive(Debug, Clone)]
pub struct PredictFinishTimeCommand {
    pub text: String,
    pub session_id: Uuid,
}

/// Result of a successful prediction.
#[derive(Debug, Clone)]
pub struct PredictFinishTimeResult {
    pub record: UserRecord,
    pub input: PredictionInput,
    pub outcome: PredictionOutcome,
    pub trace_id: String,
}

/// Why a submission did not produce a prediction.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// Some fields are missing; the predictor was not called.
    #[error("{missing}")]
    Incomplete {
        record: UserRecord,
        converted: ConvertedRecord,
        #[source]
        missing: ValidationAggregateError,
    },

    #[error("prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}

/// Handler for finish-time predictions.
pub struct PredictFinishTimeHandler {
    extractor: ProfileExtractor,
    predictor: Arc<dyn Predictor>,
}

impl PredictFinishTimeHandler {
    pub fn new(extractor: ProfileExtractor, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            extractor,
            predictor,
        }
    }

    /// Waits for outstanding trace deliveries, see [`ProfileExtractor::flush_traces`].
    pub async fn flush_traces(&self, timeout: Duration) {
        self.extractor.flush_traces(timeout).await;
    }

    #[tracing::instrument(skip(self, cmd), fields(session_id = %cmd.session_id))]
    pub async fn handle(
        &self,
        cmd: PredictFinishTimeCommand,
    ) -> Result<PredictFinishTimeResult, PipelineError> {
        // 1. Extract the profile
        let extraction = self.extractor.extract(&cmd.text, cmd.session_id).await?;
        let record = extraction.record;

        // 2. Convert the time and validate every field
        let converted = record.convert();
        let validated = match into_validated(converted) {
            Ok(validated) => validated,
            Err(missing) => {
                tracing::info!(missing = ?missing.missing(), "submission incomplete");
                return Err(PipelineError::Incomplete {
                    record,
                    converted,
                    missing,
                });
            }
        };

        // 3. Predict
        let input = PredictionInput::from(&validated);
        let seconds = self.predictor.predict(&input).map_err(|err| {
            tracing::error!(error = %err, model = %self.predictor.describe(), "prediction failed");
            err
        })?;
        let outcome = PredictionOutcome::from_seconds(seconds)?;

        tracing::info!(seconds = outcome.seconds, formatted = %outcome.formatted, "prediction ready");

        Ok(PredictFinishTimeResult {
            record,
            input,
            outcome,
            trace_id: extraction.trace_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::telemetry::NoopTraceSink;
    use crate::domain::runner::{Gender, MissingField};
    use std::sync::Mutex;

    /// Records inputs and returns a fixed number of seconds.
    struct RecordingPredictor {
        seconds: f64,
        inputs: Mutex<Vec<PredictionInput>>,
    }

    impl RecordingPredictor {
        fn returning(seconds: f64) -> Arc<Self> {
            Arc::new(Self {
                seconds,
                inputs: Mutex::new(Vec::new()),
            })
        }

        fn inputs(&self) -> Vec<PredictionInput> {
            self.inputs.lock().unwrap().clone()
        }
    }

    impl Predictor for RecordingPredictor {
        fn predict(&self, input: &PredictionInput) -> Result<f64, PredictionError> {
            self.inputs.lock().unwrap().push(*input);
            Ok(self.seconds)
        }

        fn describe(&self) -> String {
            "recording".to_string()
        }
    }

    fn handler(response: &str, predictor: Arc<RecordingPredictor>) -> PredictFinishTimeHandler {
        let provider = MockAIProvider::new().with_response(response);
        let extractor = ProfileExtractor::new(Arc::new(provider), Arc::new(NoopTraceSink));
        PredictFinishTimeHandler::new(extractor, predictor)
    }

    fn command(text: &str) -> PredictFinishTimeCommand {
        PredictFinishTimeCommand {
            text: text.to_string(),
            session_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn predicts_for_complete_profile() {
        let predictor = RecordingPredictor::returning(5025.0);
        let handler = handler(
            r#"{"age":30,"gender":"M","time_5km":"00:25:00"}"#,
            predictor.clone(),
        );

        let result = handler
            .handle(command("Mam 30 lat, jestem mężczyzną, 5 km biegam w 25 minut"))
            .await
            .unwrap();

        assert_eq!(result.outcome.formatted, "01:23:45");
        assert_eq!(
            predictor.inputs(),
            vec![PredictionInput {
                age: 30,
                gender: Gender::Male,
                time_5km_seconds: 1500,
            }]
        );
    }

    #[tokio::test]
    async fn missing_age_skips_predictor() {
        let predictor = RecordingPredictor::returning(5025.0);
        let handler = handler(
            r#"{"age":null,"gender":"K","time_5km":"00:27:00"}"#,
            predictor.clone(),
        );

        let err = handler.handle(command("Anna, 27 minut")).await.unwrap_err();

        match err {
            PipelineError::Incomplete { missing, .. } => {
                assert_eq!(missing.missing(), &[MissingField::Age]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(predictor.inputs().is_empty());
    }

    #[tokio::test]
    async fn too_short_time_is_reported_missing() {
        let predictor = RecordingPredictor::returning(5025.0);
        let handler = handler(
            r#"{"age":30,"gender":"M","time_5km":"00:09:59"}"#,
            predictor.clone(),
        );

        let err = handler.handle(command("30 lat, 9:59")).await.unwrap_err();

        match err {
            PipelineError::Incomplete { converted, missing, .. } => {
                assert_eq!(converted.time_5km_seconds, None);
                assert_eq!(missing.missing(), &[MissingField::Time5km]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(predictor.inputs().is_empty());
    }

    #[tokio::test]
    async fn nothing_extracted_reports_every_field() {
        let predictor = RecordingPredictor::returning(5025.0);
        let handler = handler(
            r#"{"age":null,"gender":null,"time_5km":"00:00:00"}"#,
            predictor.clone(),
        );

        let err = handler.handle(command("Lubię biegać")).await.unwrap_err();

        match err {
            PipelineError::Incomplete { missing, .. } => assert_eq!(
                missing.missing(),
                &[MissingField::Age, MissingField::Gender, MissingField::Time5km]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn negative_model_output_is_prediction_error() {
        let predictor = RecordingPredictor::returning(-1.0);
        let handler = handler(
            r#"{"age":30,"gender":"M","time_5km":"00:25:00"}"#,
            predictor,
        );

        let err = handler.handle(command("Mam 30 lat")).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Prediction(PredictionError::Negative(_))
        ));
    }
}
