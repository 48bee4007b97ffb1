//! Startup - loading the regression model from object storage.

use std::sync::Arc;

use crate::ports::{ModelLoadError, ModelLoader, ObjectLocation, ObjectStore, Predictor, StorageError};

/// The model could not be made available; the application cannot serve
/// predictions without it.
#[derive(Debug, thiserror::Error)]
pub enum ExternalServiceError {
    #[error("failed to fetch model artifact: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to load model artifact: {0}")]
    Model(#[from] ModelLoadError),
}

/// Fetches the artifact at `location` and deserializes it.
#[tracing::instrument(skip_all, fields(location = %location))]
pub async fn load_predictor(
    store: &dyn ObjectStore,
    loader: &dyn ModelLoader,
    location: &ObjectLocation,
) -> Result<Arc<dyn Predictor>, ExternalServiceError> {
    let bytes = store.get_object(location).await.map_err(|err| {
        tracing::error!(error = %err, "model artifact unavailable");
        err
    })?;

    let predictor = loader.load(&bytes).map_err(|err| {
        tracing::error!(error = %err, bytes = bytes.len(), "model artifact rejected");
        err
    })?;

    Ok(Arc::from(predictor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::model::JsonLinearModelLoader;
    use crate::adapters::storage::InMemoryObjectStore;
    use crate::domain::runner::{Gender, PredictionInput};

    const ARTIFACT: &str = r#"{
        "kind": "linear",
        "intercept": 0.0,
        "coefficients": { "age": 0.0, "time_5km_seconds": 4.0 },
        "gender_offsets": { "K": 0.0, "M": 0.0 }
    }"#;

    fn location() -> ObjectLocation {
        ObjectLocation::new("biegacz", "halfmarathon_model.json")
    }

    #[tokio::test]
    async fn loads_predictor_from_store() {
        let store = InMemoryObjectStore::new();
        store.put_object(location(), ARTIFACT).await;

        let predictor = load_predictor(&store, &JsonLinearModelLoader, &location())
            .await
            .unwrap();

        let seconds = predictor
            .predict(&PredictionInput {
                age: 30,
                gender: Gender::Female,
                time_5km_seconds: 1500,
            })
            .unwrap();
        assert!((seconds - 6000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn missing_artifact_is_storage_error() {
        let store = InMemoryObjectStore::new();

        let err = load_predictor(&store, &JsonLinearModelLoader, &location())
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ExternalServiceError::Storage(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn corrupt_artifact_is_model_error() {
        let store = InMemoryObjectStore::new();
        store.put_object(location(), "not json").await;

        let err = load_predictor(&store, &JsonLinearModelLoader, &location())
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ExternalServiceError::Model(ModelLoadError::Malformed(_))));
    }
}
