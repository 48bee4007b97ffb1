//! Langfuse tracing configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Langfuse configuration; tracing is disabled unless both keys are set
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub langfuse_public_key: Option<String>,

    pub langfuse_secret_key: Option<String>,

    #[serde(default = "default_host")]
    pub langfuse_host: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TelemetryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Langfuse is configured
    pub fn is_enabled(&self) -> bool {
        let set = |key: &Option<String>| key.as_ref().is_some_and(|k| !k.trim().is_empty());
        set(&self.langfuse_public_key) && set(&self.langfuse_secret_key)
    }

    /// Validate telemetry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.langfuse_public_key.is_some() != self.langfuse_secret_key.is_some() {
            return Err(ValidationError::IncompleteCredentials("telemetry.langfuse_public_key"));
        }
        if !self.langfuse_host.starts_with("http://") && !self.langfuse_host.starts_with("https://")
        {
            return Err(ValidationError::InvalidUrl {
                field: "telemetry.langfuse_host",
                value: self.langfuse_host.clone(),
            });
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout("telemetry"));
        }
        Ok(())
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            langfuse_public_key: None,
            langfuse_secret_key: None,
            langfuse_host: default_host(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_host() -> String {
    "https://cloud.langfuse.com".to_string()
}

fn default_timeout() -> u64 {
    10
}
