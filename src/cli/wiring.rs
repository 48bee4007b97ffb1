//! Builds adapters from configuration.

use secrecy::Secret;
use std::sync::Arc;

use crate::adapters::ai::{OpenAIConfig, OpenAIProvider};
use crate::adapters::credentials::CredentialChain;
use crate::adapters::model::JsonLinearModelLoader;
use crate::adapters::storage::{LocalObjectStore, S3Config, S3ObjectStore};
use crate::adapters::telemetry::{LangfuseConfig, LangfuseTraceSink, NoopTraceSink};
use crate::application::{
    load_predictor, ExternalServiceError, PredictFinishTimeHandler, ProfileExtractor, Session,
};
use crate::config::{AiConfig, AppConfig, ConfigError, StorageConfig, TelemetryConfig};
use crate::ports::{AIError, AIProvider, CredentialError, ObjectStore, StorageError, TraceError, TraceSink};

/// Failures that stop the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Model(#[from] ExternalServiceError),

    #[error("failed to set up the language model client: {0}")]
    Provider(#[from] AIError),

    #[error("failed to set up tracing: {0}")]
    Telemetry(#[from] TraceError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Local directory when configured, otherwise the S3-compatible endpoint.
pub fn object_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    if let Some(ref dir) = config.local_dir {
        tracing::info!(dir = %dir, "using local model storage");
        return Ok(Arc::new(LocalObjectStore::new(dir, config.max_object_bytes)));
    }

    let mut s3 = S3Config::new(&config.region)
        .with_timeout(config.timeout())
        .with_max_object_bytes(config.max_object_bytes);
    if let Some(ref endpoint) = config.endpoint_url {
        s3 = s3.with_endpoint(endpoint);
    }
    if let (Some(id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
        s3 = s3.with_credentials(id, Secret::new(secret.clone()));
    }
    Ok(Arc::new(S3ObjectStore::new(s3)?))
}

/// Langfuse when both keys are set, otherwise a no-op sink.
pub fn trace_sink(config: &TelemetryConfig) -> Result<Arc<dyn TraceSink>, TraceError> {
    match (&config.langfuse_public_key, &config.langfuse_secret_key) {
        (Some(public_key), Some(secret_key)) if config.is_enabled() => {
            let langfuse = LangfuseConfig::new(public_key, Secret::new(secret_key.clone()))
                .with_host(&config.langfuse_host)
                .with_timeout(config.timeout());
            Ok(Arc::new(LangfuseTraceSink::new(langfuse)?))
        }
        _ => {
            tracing::debug!("Langfuse not configured, traces are discarded");
            Ok(Arc::new(NoopTraceSink))
        }
    }
}

pub fn ai_provider(config: &AiConfig, api_key: Secret<String>) -> Result<Arc<dyn AIProvider>, AIError> {
    let openai = OpenAIConfig::new(api_key)
        .with_model(&config.model)
        .with_base_url(&config.base_url)
        .with_timeout(config.timeout())
        .with_max_retries(config.max_retries);
    Ok(Arc::new(OpenAIProvider::new(openai)?))
}

/// Loads the model, resolves the API key (cached on the session) and
/// assembles the prediction handler.
pub async fn build_handler(
    config: &AppConfig,
    session: &mut Session,
    api_key_prompt: &str,
) -> Result<PredictFinishTimeHandler, AppError> {
    let store = object_store(&config.storage).map_err(ExternalServiceError::from)?;
    let predictor = load_predictor(
        store.as_ref(),
        &JsonLinearModelLoader,
        &config.storage.model_location(),
    )
    .await?;

    let api_key = match session.api_key() {
        Some(key) => key.clone(),
        None => {
            let key = CredentialChain::standard(config.ai.api_key(), api_key_prompt).resolve()?;
            session.set_api_key(key.clone());
            key
        }
    };

    let extractor = ProfileExtractor::new(
        ai_provider(&config.ai, api_key)?,
        trace_sink(&config.telemetry)?,
    );
    Ok(PredictFinishTimeHandler::new(extractor, predictor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ObjectLocation;
    use tempfile::TempDir;

    #[tokio::test]
    async fn local_dir_selects_local_store() {
        let dir = TempDir::new().unwrap();
        tokio::fs::create_dir_all(dir.path().join("biegacz")).await.unwrap();
        tokio::fs::write(dir.path().join("biegacz/halfmarathon_model.json"), b"{}")
            .await
            .unwrap();
        let config = StorageConfig {
            local_dir: Some(dir.path().to_string_lossy().to_string()),
            ..Default::default()
        };

        let store = object_store(&config).unwrap();
        let bytes = store
            .get_object(&ObjectLocation::new("biegacz", "halfmarathon_model.json"))
            .await
            .unwrap();

        assert_eq!(bytes, b"{}");
    }

    #[test]
    fn remote_store_is_default() {
        assert!(object_store(&StorageConfig::default()).is_ok());
    }

    #[test]
    fn half_configured_telemetry_falls_back_to_noop() {
        let config = TelemetryConfig {
            langfuse_public_key: Some("pk-lf-1".to_string()),
            ..Default::default()
        };
        assert!(trace_sink(&config).is_ok());
    }

    #[tokio::test]
    async fn missing_model_is_fatal_before_asking_for_key() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            storage: StorageConfig {
                local_dir: Some(dir.path().to_string_lossy().to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut session = Session::new();

        let err = build_handler(&config, &mut session, "key").await.err().unwrap();

        assert!(matches!(err, AppError::Model(ExternalServiceError::Storage(_))));
        assert!(session.api_key().is_none());
    }
}
