//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - language model used for extraction
//! - `ObjectStore` - blob storage holding the model artifact
//! - `Predictor` / `ModelLoader` - the regression model and its deserializer
//! - `CredentialSource` - where the API key comes from
//! - `TraceSink` - passive observability of model calls

mod ai_provider;
mod credential_source;
mod object_store;
mod predictor;
mod trace_sink;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, ResponseFormat, TokenUsage,
};
pub use credential_source::{CredentialError, CredentialSource};
pub use object_store::{ObjectLocation, ObjectStore, StorageError};
pub use predictor::{ModelLoadError, ModelLoader, Predictor};
pub use trace_sink::{TraceError, TraceEvent, TraceLevel, TraceSink};
