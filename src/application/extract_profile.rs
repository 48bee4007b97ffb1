//! ProfileExtractor - free text to a `UserRecord` via the language model.
//!
//! The model is asked for structured output matching
//! [`ExtractionSchema::json_schema`]; its answer is then coerced into a
//! `UserRecord` in a single pass. Every call is reported to the trace sink
//! from a background task, so a slow tracing backend never holds up the
//! answer; [`ProfileExtractor::flush_traces`] waits for those tasks.

use chrono::Utc;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::domain::runner::{ExtractionSchema, SchemaValidationError, UserRecord};
use crate::domain::runner::schema::SCHEMA_NAME;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata, ResponseFormat,
    TokenUsage, TraceEvent, TraceLevel, TraceSink,
};

/// Operation name used for request metadata and traces.
pub const EXTRACT_OPERATION: &str = "extract_runner_profile";

const MAX_COMPLETION_TOKENS: u32 = 200;

// Input is Polish, and gender is often only visible in verb endings.
const SYSTEM_PROMPT: &str = "\
Wyodrębnij z tekstu użytkownika następujące dane:
- age: wiek jako liczba całkowita z przedziału 10-99, w przeciwnym razie null
- gender: K dla kobiety, M dla mężczyzny lub null, jeśli nie da się tego ustalić
- time_5km: czas biegu na 5 km w formacie HH:MM:SS lub 00:00:00, jeśli nie da się go ustalić

Interpretuj dane możliwie elastycznie:
- Jeśli podano imię, ustal na jego podstawie płeć; zwróć też uwagę na męskie i żeńskie formy czasowników.
- Jeśli czas podano w innym formacie niż HH:MM:SS (np. \"25 minut\" albo \"24:30\"), przelicz go.
- Jeśli czegoś brakuje, wpisz wartość domyślną dla danego pola.
- Odpowiedz wyłącznie obiektem JSON z polami age, gender i time_5km.";

/// Errors from profile extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("language model request failed: {0}")]
    Provider(#[from] AIError),

    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
}

/// A successfully extracted profile.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: UserRecord,
    pub trace_id: String,
    pub usage: TokenUsage,
}

/// Extracts runner profiles from free text.
pub struct ProfileExtractor {
    ai_provider: Arc<dyn AIProvider>,
    trace_sink: Arc<dyn TraceSink>,
    pending_traces: Mutex<JoinSet<()>>,
}

impl ProfileExtractor {
    pub fn new(ai_provider: Arc<dyn AIProvider>, trace_sink: Arc<dyn TraceSink>) -> Self {
        Self {
            ai_provider,
            trace_sink,
            pending_traces: Mutex::new(JoinSet::new()),
        }
    }

    /// Waits up to `timeout` for traces that are still being delivered.
    ///
    /// Deliveries still running after the timeout are abandoned.
    pub async fn flush_traces(&self, timeout: Duration) {
        let mut pending = std::mem::take(&mut *self.pending());
        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        let drained = tokio::time::timeout(timeout, async {
            while pending.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            tracing::warn!(pending = count, ?timeout, "gave up waiting for trace delivery");
        }
    }

    /// Hands the event to a background task; failures are only logged.
    fn dispatch_trace(&self, event: TraceEvent) {
        let sink = Arc::clone(&self.trace_sink);
        let mut pending = self.pending();
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            if let Err(err) = sink.record(event).await {
                tracing::warn!(error = %err, "failed to record extraction trace");
            }
        });
    }

    fn pending(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.pending_traces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Extracts age, gender and 5 km time from `text`.
    ///
    /// Unresolvable fields fall back to their defaults; only a provider
    /// failure or output that does not fit the contract is an error.
    #[tracing::instrument(skip(self, text), fields(trace_id, chars = text.chars().count()))]
    pub async fn extract(&self, text: &str, session_id: Uuid) -> Result<Extraction, ExtractionError> {
        let trace_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("trace_id", trace_id.as_str());

        let info = self.ai_provider.provider_info();
        let request = build_request(text, session_id, &trace_id, info.supports_json_schema);
        let started_at = Utc::now();
        let result = self.ai_provider.complete(request).await;
        let ended_at = Utc::now();

        let (outcome, output, model, usage) = match result {
            Ok(response) => {
                let outcome = parse_record(&response.content);
                let output = match outcome {
                    Ok(ref record) => json!(record),
                    Err(_) => Value::String(response.content.clone()),
                };
                (
                    outcome.map_err(ExtractionError::from),
                    output,
                    response.model,
                    response.usage,
                )
            }
            Err(err) => (
                Err(ExtractionError::from(err)),
                Value::Null,
                info.model,
                TokenUsage::zero(),
            ),
        };

        let (level, status_message) = match outcome {
            Ok(_) => (TraceLevel::Default, None),
            Err(ref err) => (TraceLevel::Error, Some(err.to_string())),
        };

        let event = TraceEvent {
            trace_id: trace_id.clone(),
            session_id: session_id.to_string(),
            name: EXTRACT_OPERATION.to_string(),
            model,
            input: json!({ "text": text }),
            output,
            usage: usage.clone(),
            level,
            status_message,
            started_at,
            ended_at,
        };
        self.dispatch_trace(event);

        match outcome {
            Ok(record) => {
                tracing::info!(
                    age = ?record.age(),
                    gender = ?record.gender(),
                    time_5km = record.time_5km(),
                    "profile extracted"
                );
                Ok(Extraction {
                    record,
                    trace_id,
                    usage,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile extraction failed");
                Err(err)
            }
        }
    }
}

/// Strict schema where the provider enforces one, plain JSON mode otherwise.
fn build_request(
    text: &str,
    session_id: Uuid,
    trace_id: &str,
    supports_json_schema: bool,
) -> CompletionRequest {
    let format = if supports_json_schema {
        ResponseFormat::JsonSchema {
            name: SCHEMA_NAME.to_string(),
            schema: ExtractionSchema::json_schema(),
            strict: true,
        }
    } else {
        ResponseFormat::JsonObject
    };

    CompletionRequest::new(RequestMetadata::new(session_id, trace_id, EXTRACT_OPERATION))
        .with_system_prompt(SYSTEM_PROMPT)
        .with_message(MessageRole::User, format!("Tekst:\n'{}'", text))
        .with_temperature(0.0)
        .with_max_tokens(MAX_COMPLETION_TOKENS)
        .with_response_format(format)
}

/// Parses the model's answer, tolerating code fences and surrounding prose.
fn parse_record(content: &str) -> Result<UserRecord, SchemaValidationError> {
    let json = extract_json(content);
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SchemaValidationError::all_fields(format!("not valid JSON: {}", e)))?;
    ExtractionSchema::coerce(&value)
}

/// Finds the JSON object in a response that may contain markdown fences.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    for pattern in ["```json", "```"] {
        if let Some(start) = trimmed.find(pattern) {
            let body = &trimmed[start + pattern.len()..];
            if let Some(end) = body.find("```") {
                return body[..end].trim();
            }
        }
    }

    match trimmed.find('{') {
        Some(start) => balanced_object(trimmed, start).unwrap_or(trimmed),
        None => trimmed,
    }
}

fn balanced_object(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
