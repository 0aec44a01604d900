//! Provider call outcome value object

use serde::{Deserialize, Serialize};

/// What came back from one provider call, retries included.
///
/// Transient: it feeds the response parser and the resolution event sink,
/// and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCallOutcome {
    /// Reply text when the call succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    /// Wall-clock time across all attempts
    pub latency_ms: u64,
    pub succeeded: bool,
    /// Last failure, or the reason a stub provider stood in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Number of attempts made (0 for the stub provider)
    pub attempts: u32,
    /// Reply came from the offline stand-in rather than a real provider
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stand_in: bool,
}

impl ProviderCallOutcome {
    pub fn success(raw_text: impl Into<String>, latency_ms: u64, attempts: u32) -> Self {
        Self {
            raw_text: Some(raw_text.into()),
            latency_ms,
            succeeded: true,
            failure_reason: None,
            attempts,
            stand_in: false,
        }
    }

    pub fn failure(reason: impl Into<String>, latency_ms: u64, attempts: u32) -> Self {
        Self {
            raw_text: None,
            latency_ms,
            succeeded: false,
            failure_reason: Some(reason.into()),
            attempts,
            stand_in: false,
        }
    }

    /// Mark a reply as synthesized by a stand-in, noting why.
    ///
    /// Stand-in answers are returned to the caller but never written
    /// through to the store or the cache.
    pub fn stand_in(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self.stand_in = true;
        self
    }

    /// Reply text, empty when the call failed.
    pub fn text(&self) -> &str {
        self.raw_text.as_deref().unwrap_or("")
    }
}
