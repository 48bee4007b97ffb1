//! S3-Compatible Object Store Adapter
//!
//! Fetches objects with a path-style `GET {endpoint}/{bucket}/{key}`,
//! signed with AWS Signature V4 when credentials are configured. Works with
//! AWS S3 and DigitalOcean Spaces alike.
//!
//! # Configuration
//!
//! ```ignore
//! let config = S3Config::new("fra1")
//!     .with_endpoint("https://fra1.digitaloceanspaces.com")
//!     .with_credentials("DO00EXAMPLE", Secret::new(secret))
//!     .with_timeout(Duration::from_secs(30));
//!
//! let store = S3ObjectStore::new(config)?;
//! ```

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode, Url};
use secrecy::Secret;
use std::time::Duration;

use super::sigv4::{encode_path, SigV4Signer};
use crate::ports::{ObjectLocation, ObjectStore, StorageError};

/// Configuration for the S3 adapter.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    /// Endpoint base URL; defaults to the AWS regional endpoint.
    pub endpoint: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<Secret<String>>,
    pub timeout: Duration,
    pub max_object_bytes: u64,
}

impl S3Config {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            timeout: Duration::from_secs(30),
            max_object_bytes: 16 * 1024 * 1024,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: Secret<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_object_bytes(mut self, max: u64) -> Self {
        self.max_object_bytes = max;
        self
    }

    fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", self.region))
    }
}

/// Object store backed by an S3-compatible HTTP API.
#[derive(Debug)]
pub struct S3ObjectStore {
    endpoint: Url,
    signer: Option<SigV4Signer>,
    client: Client,
    timeout: Duration,
    max_object_bytes: u64,
}

impl S3ObjectStore {
    pub fn new(config: S3Config) -> Result<Self, StorageError> {
        let endpoint = Url::parse(&config.endpoint_url()).map_err(|e| {
            StorageError::InvalidConfig(format!("invalid endpoint '{}': {}", config.endpoint_url(), e))
        })?;
        if endpoint.host_str().is_none() {
            return Err(StorageError::InvalidConfig(format!(
                "endpoint '{}' has no host",
                endpoint
            )));
        }

        let signer = match (config.access_key_id, config.secret_access_key) {
            (Some(access_key_id), Some(secret)) => {
                Some(SigV4Signer::new(access_key_id, secret, config.region))
            }
            (None, None) => None,
            _ => {
                return Err(StorageError::InvalidConfig(
                    "access key id and secret access key must be set together".to_string(),
                ))
            }
        };

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            signer,
            client,
            timeout: config.timeout,
            max_object_bytes: config.max_object_bytes,
        })
    }

    /// Path-style object path, URI-encoded.
    fn object_path(&self, location: &ObjectLocation) -> String {
        let base = self.endpoint.path().trim_end_matches('/');
        encode_path(&format!("{}/{}/{}", base, location.bucket, location.key))
    }

    /// Host header value, including a non-default port.
    fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    fn map_status(&self, status: StatusCode, location: &ObjectLocation, body: String) -> StorageError {
        match status {
            StatusCode::NOT_FOUND => StorageError::NotFound(location.clone()),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                StorageError::AccessDenied(location.clone())
            }
            _ => StorageError::Status {
                status: status.as_u16(),
                message: body,
            },
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[tracing::instrument(skip(self), fields(location = %location))]
    async fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(location);
        let mut url = self.endpoint.clone();
        url.set_path(&path);

        let mut request = self.client.get(url);
        if let Some(ref signer) = self.signer {
            let headers = signer.sign_get(&self.host(), &path, Utc::now())?;
            request = request
                .header("authorization", headers.authorization)
                .header("x-amz-date", headers.amz_date)
                .header("x-amz-content-sha256", headers.content_sha256);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                StorageError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                StorageError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "object storage request failed");
            return Err(self.map_status(status, location, body));
        }

        if let Some(size) = response.content_length() {
            if size > self.max_object_bytes {
                return Err(StorageError::TooLarge {
                    location: location.clone(),
                    size,
                    max: self.max_object_bytes,
                });
            }
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                StorageError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                StorageError::network(e.to_string())
            }
        })?;

        if bytes.len() as u64 > self.max_object_bytes {
            return Err(StorageError::TooLarge {
                location: location.clone(),
                size: bytes.len() as u64,
                max: self.max_object_bytes,
            });
        }

        tracing::debug!(bytes = bytes.len(), "fetched object");
        Ok(bytes.to_vec())
    }
}
