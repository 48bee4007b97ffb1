//! Storage Adapters
//!
//! Implementations of the ObjectStore port used to fetch the model artifact.
//!
//! ## Available Adapters
//!
//! - **S3ObjectStore** - S3-compatible HTTP API (AWS, DigitalOcean Spaces)
//! - **LocalObjectStore** - Reads `{root}/{bucket}/{key}` from disk
//! - **InMemoryObjectStore** - Keeps objects in memory (testing)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{LocalObjectStore, S3Config, S3ObjectStore};
//!
//! // Production: remote bucket
//! let store = S3ObjectStore::new(S3Config::new("fra1").with_endpoint(endpoint))?;
//!
//! // Development: local directory
//! let store = LocalObjectStore::new("./models", 16 * 1024 * 1024);
//! ```

mod in_memory_object_store;
mod local_object_store;
mod s3_object_store;
mod sigv4;

pub use in_memory_object_store::InMemoryObjectStore;
pub use local_object_store::LocalObjectStore;
pub use s3_object_store::{S3Config, S3ObjectStore};
pub use sigv4::{SigV4Signer, SignedHeaders};
