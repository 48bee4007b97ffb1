use async_trait::async_trait;

use crate::ports::{TraceError, TraceEvent, TraceSink};

/// Trace sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTraceSink;

#[async_trait]
impl TraceSink for NoopTraceSink {
    async fn record(&self, event: TraceEvent) -> Result<(), TraceError> {
        tracing::trace!(trace_id = %event.trace_id, "trace discarded");
        Ok(())
    }
}
