//! Trace Sink Port - Passive observability of language model calls.
//!
//! Every extraction is reported to a trace sink (input, output, latency,
//! token usage). Sinks are fire-and-forget from the caller's point of view:
//! a failing sink is logged and never changes the extraction result.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::ai_provider::TokenUsage;

/// One traced model call.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub trace_id: String,
    pub session_id: String,
    /// Operation name, e.g. `extract_runner_profile`.
    pub name: String,
    pub model: String,
    pub input: Value,
    pub output: Value,
    pub usage: TokenUsage,
    pub level: TraceLevel,
    pub status_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl TraceEvent {
    /// Call duration in milliseconds.
    pub fn latency_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }
}

/// Outcome of the traced call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    Default,
    Error,
}

/// Port for recording traces.
#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn record(&self, event: TraceEvent) -> Result<(), TraceError>;
}

/// Errors from a trace sink. Callers log these and move on.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("trace backend unreachable: {0}")]
    Network(String),

    #[error("trace backend rejected the batch with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("failed to encode trace: {0}")]
    Encoding(String),
}
