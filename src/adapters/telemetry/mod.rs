//! Telemetry Adapters
//!
//! Implementations of the TraceSink port.
//!
//! - **LangfuseTraceSink** - posts ingestion batches to a Langfuse host
//! - **NoopTraceSink** - discards everything (tracing not configured)
//! - **InMemoryTraceSink** - keeps events for assertions in tests

mod in_memory_sink;
mod langfuse_sink;
mod noop_sink;

pub use in_memory_sink::InMemoryTraceSink;
pub use langfuse_sink::{LangfuseConfig, LangfuseTraceSink};
pub use noop_sink::NoopTraceSink;
