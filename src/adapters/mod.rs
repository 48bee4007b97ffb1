//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - language model providers (OpenAI, mock)
//! - `credentials` - API key sources and the lookup chain
//! - `model` - regression model artifact loaders
//! - `storage` - object stores holding the model artifact
//! - `telemetry` - trace sinks (Langfuse, no-op, in-memory)

pub mod ai;
pub mod credentials;
pub mod model;
pub mod storage;
pub mod telemetry;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use credentials::CredentialChain;
pub use model::JsonLinearModelLoader;
pub use storage::{InMemoryObjectStore, LocalObjectStore, S3Config, S3ObjectStore};
pub use telemetry::{InMemoryTraceSink, LangfuseConfig, LangfuseTraceSink, NoopTraceSink};
