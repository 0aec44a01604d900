//! Port for structured resolution events.
//!
//! Defines the [`ResolutionObserver`] trait for recording what happened
//! during a resolution (tier hits, provider latency, degraded tiers) to a
//! structured sink.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures
//! machine-readable records for statistics.

use qbank_domain::{ParseStrategy, ProviderCallOutcome, preview};
use serde_json::{Value, json};

/// Characters of question text kept in event payloads
const QUESTION_PREVIEW_CHARS: usize = 50;

/// A structured resolution event.
///
/// Each event has a type string and a JSON payload containing event-specific
/// fields. Sinks add their own timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionEvent {
    /// Event type identifier (e.g., "cache_hit", "provider_call").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ResolutionEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn cache_hit(question: &str, backend: &str) -> Self {
        Self::new(
            "cache_hit",
            json!({ "question": preview(question, QUESTION_PREVIEW_CHARS), "backend": backend }),
        )
    }

    pub fn store_hit(question: &str) -> Self {
        Self::new(
            "store_hit",
            json!({ "question": preview(question, QUESTION_PREVIEW_CHARS) }),
        )
    }

    pub fn provider_call(
        question: &str,
        provider: &str,
        model: &str,
        outcome: &ProviderCallOutcome,
        strategy: Option<ParseStrategy>,
        answered: bool,
    ) -> Self {
        Self::new(
            "provider_call",
            json!({
                "question": preview(question, QUESTION_PREVIEW_CHARS),
                "provider": provider,
                "model": model,
                "latency_ms": outcome.latency_ms,
                "attempts": outcome.attempts,
                "succeeded": outcome.succeeded,
                "failure_reason": outcome.failure_reason,
                "parse_strategy": strategy.map(|s| s.as_str()),
                "stand_in": outcome.stand_in,
                "answered": answered,
            }),
        )
    }

    pub fn not_found(question: &str) -> Self {
        Self::new(
            "not_found",
            json!({ "question": preview(question, QUESTION_PREVIEW_CHARS) }),
        )
    }

    pub fn persist_failed(question: &str, error: &str) -> Self {
        Self::new(
            "persist_failed",
            json!({ "question": preview(question, QUESTION_PREVIEW_CHARS), "error": error }),
        )
    }

    pub fn cache_degraded(backend: &str, operation: &str, error: &str) -> Self {
        Self::new(
            "cache_degraded",
            json!({ "backend": backend, "operation": operation, "error": error }),
        )
    }
    /// Flatten into one log record carrying `type` and `timestamp`.
    ///
    /// Object payloads gain the two fields; any other payload is nested
    /// under `data`.
    pub fn into_record(self, timestamp: impl Into<String>) -> Value {
        let timestamp = Value::String(timestamp.into());
        let event_type = Value::String(self.event_type.to_string());
        match self.payload {
            Value::Object(mut fields) => {
                fields.insert("type".to_string(), event_type);
                fields.insert("timestamp".to_string(), timestamp);
                Value::Object(fields)
            }
            data => json!({ "type": event_type, "timestamp": timestamp, "data": data }),
        }
    }
}

/// Port for recording resolution events.
///
/// The `record` method is intentionally synchronous and non-fallible:
/// a sink that cannot write must not change a resolution outcome.
pub trait ResolutionObserver: Send + Sync {
    /// Record a resolution event.
    fn record(&self, event: ResolutionEvent);
}

/// No-op implementation for tests and when event logging is disabled.
pub struct NoResolutionObserver;

impl ResolutionObserver for NoResolutionObserver {
    fn record(&self, _event: ResolutionEvent) {}
}
