//! Model artifact storage configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::ports::ObjectLocation;

/// Where the model artifact is fetched from
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding the artifact
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Object key of the artifact
    #[serde(default = "default_model_key")]
    pub model_key: String,

    /// Region used for request signing
    #[serde(default = "default_region")]
    pub region: String,

    /// S3-compatible endpoint (e.g. https://fra1.digitaloceanspaces.com)
    pub endpoint_url: Option<String>,

    /// Access key id (anonymous access when unset)
    pub access_key_id: Option<String>,

    /// Secret access key
    pub secret_access_key: Option<String>,

    /// Read from `{local_dir}/{bucket}/{model_key}` instead of the network
    pub local_dir: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Largest accepted artifact
    #[serde(default = "default_max_object_bytes")]
    pub max_object_bytes: u64,
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn model_location(&self) -> ObjectLocation {
        ObjectLocation::new(&self.bucket, &self.model_key)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bucket.trim().is_empty() {
            return Err(ValidationError::MissingRequired("storage.bucket"));
        }
        if self.model_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("storage.model_key"));
        }
        if let Some(ref endpoint) = self.endpoint_url {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ValidationError::InvalidUrl {
                    field: "storage.endpoint_url",
                    value: endpoint.clone(),
                });
            }
        }
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(ValidationError::IncompleteCredentials("storage.access_key_id"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout("storage"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            model_key: default_model_key(),
            region: default_region(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            local_dir: None,
            timeout_secs: default_timeout(),
            max_object_bytes: default_max_object_bytes(),
        }
    }
}

fn default_bucket() -> String {
    "biegacz".to_string()
}

fn default_model_key() -> String {
    "halfmarathon_model.json".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_object_bytes() -> u64 {
    16 * 1024 * 1024
}
