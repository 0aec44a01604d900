//! Offline stand-in provider.
//!
//! Used when the requested provider is missing, disabled, or has no usable
//! credential. Replies instantly with a fixed `{"answer": ...}` envelope.

use qbank_domain::{ProviderCallOutcome, preview};
use serde_json::json;
use tracing::{info, warn};

/// Answer text the stub always returns
pub const STUB_ANSWER: &str = "这是模拟的AI答案";

pub const STUB_IDENTIFIER: &str = "mock";
pub const STUB_MODEL: &str = "mock-model";

#[derive(Debug, Clone)]
pub struct StubProvider {
    reason: String,
}

impl StubProvider {
    /// Stub standing in for a provider that cannot be called, for `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!("Using stub provider: {}", reason);
        Self { reason }
    }

    /// Why the configured provider could not be used
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn call(&self, prompt: &str) -> ProviderCallOutcome {
        info!("Stub provider call: {}", preview(prompt, 50));
        let reply = json!({ "answer": STUB_ANSWER }).to_string();
        ProviderCallOutcome::success(reply, 0, 0)
            .stand_in(format!("stub provider substituted: {}", self.reason))
    }
}
