//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `HALFMARATHON` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use halfmarathon_predictor::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Model at {}", config.storage.model_location());
//! ```

mod ai;
mod app;
mod error;
mod storage;
mod telemetry;

pub use ai::AiConfig;
pub use app::AppSection;
pub use error::{ConfigError, ValidationError};
pub use storage::StorageConfig;
pub use telemetry::TelemetryConfig;

use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;

/// Conventional variables used by S3 and Langfuse tooling, read as defaults
/// beneath the prefixed ones.
const CONVENTIONAL_ENV: &[(&str, &str)] = &[
    ("storage.region", "AWS_REGION"),
    ("storage.endpoint_url", "AWS_ENDPOINT_URL_S3"),
    ("storage.access_key_id", "AWS_ACCESS_KEY_ID"),
    ("storage.secret_access_key", "AWS_SECRET_ACCESS_KEY"),
    ("telemetry.langfuse_public_key", "LANGFUSE_PUBLIC_KEY"),
    ("telemetry.langfuse_secret_key", "LANGFUSE_SECRET_KEY"),
    ("telemetry.langfuse_host", "LANGFUSE_HOST"),
];

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// User surface (locale, logging, reveal animation)
    #[serde(default)]
    pub app: AppSection,

    /// Language model (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Model artifact storage (S3-compatible or local directory)
    #[serde(default)]
    pub storage: StorageConfig,

    /// Langfuse tracing
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Seeds defaults from conventional variables (`AWS_*`, `LANGFUSE_*`)
    /// 3. Reads environment variables with `HALFMARATHON` prefix
    /// 4. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `HALFMARATHON__AI__MODEL=gpt-4o` -> `ai.model = gpt-4o`
    /// - `HALFMARATHON__STORAGE__BUCKET=...` -> `storage.bucket = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let builder = with_conventional_env(config::Config::builder())?;

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("HALFMARATHON")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.app.validate()?;
        self.ai.validate()?;
        self.storage.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

fn with_conventional_env(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    for (key, var) in CONVENTIONAL_ENV {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                builder = builder.set_default(*key, value)?;
            }
        }
    }
    Ok(builder)
}
