//! Object Store Port - Retrieval of the serialized model artifact.
//!
//! The regression model is published as a blob in an S3-compatible bucket.
//! Adapters fetch it by bucket and key and hand back the raw bytes.

use async_trait::async_trait;
use std::fmt;

/// Where an object lives in storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Port for reading objects from blob storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches the whole object into memory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the object does not exist.
    async fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError>;
}

/// Errors from object storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(ObjectLocation),

    #[error("access denied to {0}")]
    AccessDenied(ObjectLocation),

    #[error("object {location} is {size} bytes, above the {max} byte limit")]
    TooLarge {
        location: ObjectLocation,
        size: u64,
        max: u64,
    },

    #[error("storage request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("storage network error: {0}")]
    Network(String),

    #[error("storage returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),
}

impl StorageError {
    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_displays_as_path() {
        let location = ObjectLocation::new("biegacz", "halfmarathon_model.json");
        assert_eq!(location.to_string(), "biegacz/halfmarathon_model.json");
    }

    #[test]
    fn storage_error_displays_location() {
        let err = StorageError::NotFound(ObjectLocation::new("b", "k"));
        assert_eq!(err.to_string(), "object not found: b/k");
    }
}
