//! In-memory trace sink for tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::ports::{TraceError, TraceEvent, TraceSink};

/// Collects events; can be told to fail to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTraceSink {
    events: Arc<Mutex<Vec<TraceEvent>>>,
    fail: bool,
    delay: Duration,
}

impl InMemoryTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every `record` call is rejected.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Makes every `record` call take at least `delay`, like a slow backend.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.lock().clone()
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TraceEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TraceSink for InMemoryTraceSink {
    async fn record(&self, event: TraceEvent) -> Result<(), TraceError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(TraceError::Rejected {
                status: 503,
                message: "sink configured to fail".to_string(),
            });
        }
        self.lock().push(event);
        Ok(())
    }
}
