//! Answer provider port
//!
//! Defines how the application layer reaches an inference provider.
//! Implementations (HTTP dialects, the offline stub) live in the
//! infrastructure layer.

use async_trait::async_trait;
use qbank_domain::ProviderCallOutcome;

/// One configured inference provider.
///
/// `call` never fails: transport errors, timeouts and exhausted retries are
/// reported through [`ProviderCallOutcome::succeeded`] and
/// [`ProviderCallOutcome::failure_reason`].
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Provider identifier from configuration
    fn identifier(&self) -> &str;

    /// Model name used for requests
    fn model_name(&self) -> &str;

    /// Send a prompt and collect the reply text
    async fn call(&self, prompt: &str) -> ProviderCallOutcome;
}
