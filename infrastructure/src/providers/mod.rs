//! Inference provider client.
//!
//! ```text
//! ProviderClient (enum, chosen once by `select`)
//!   ├── ChatCompletions(HttpProvider<ChatCompletions>)
//!   ├── GenerateContent(HttpProvider<GenerateContent>)
//!   └── Stub(StubProvider)          <- missing / disabled / no credential
//! ```

pub mod chat_completions;
pub mod error;
pub mod generate_content;
pub mod http;
pub mod retry;
pub mod stub;

pub use chat_completions::ChatCompletions;
pub use error::ProviderError;
pub use generate_content::GenerateContent;
pub use http::{Dialect, HttpProvider};
pub use retry::{RetryOutcome, RetryPolicy};
pub use stub::StubProvider;

use async_trait::async_trait;
use qbank_application::ports::answer_provider::AnswerProvider;
use qbank_domain::{AiSettings, ProviderCallOutcome, ProviderConfig, ProviderDialect};
use tracing::info;

/// The provider the resolver talks to
pub enum ProviderClient {
    ChatCompletions(HttpProvider<ChatCompletions>),
    GenerateContent(HttpProvider<GenerateContent>),
    Stub(StubProvider),
}

impl ProviderClient {
    /// Pick the provider named `requested` (or the default provider) from
    /// `settings`, substituting the stub when it cannot be called.
    pub fn select(settings: &AiSettings, requested: Option<&str>) -> Self {
        let identifier = requested
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(&settings.default_provider);

        let Some(config) = settings.get(identifier) else {
            return ProviderClient::Stub(StubProvider::new(format!(
                "provider '{}' is not configured",
                identifier
            )));
        };

        Self::from_config(config.clone())
    }

    /// Build the client for one provider config.
    pub fn from_config(config: ProviderConfig) -> Self {
        if let Some(reason) = config.unusable_reason() {
            return ProviderClient::Stub(StubProvider::new(reason));
        }

        let identifier = config.identifier.clone();
        let built = match config.dialect {
            ProviderDialect::ChatCompletions => {
                HttpProvider::new(ChatCompletions, config).map(ProviderClient::ChatCompletions)
            }
            ProviderDialect::GenerateContent => {
                HttpProvider::new(GenerateContent, config).map(ProviderClient::GenerateContent)
            }
        };

        match built {
            Ok(client) => {
                info!(
                    "Using provider {} ({}, {} dialect)",
                    client.identifier(),
                    client.model_name(),
                    client.dialect_name()
                );
                client
            }
            Err(e) => ProviderClient::Stub(StubProvider::new(format!(
                "provider '{}' could not be initialized: {}",
                identifier, e
            ))),
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, ProviderClient::Stub(_))
    }

    /// Why the stub stands in, if it does.
    pub fn stub_reason(&self) -> Option<&str> {
        match self {
            ProviderClient::Stub(stub) => Some(stub.reason()),
            _ => None,
        }
    }

    pub fn dialect_name(&self) -> &'static str {
        match self {
            ProviderClient::ChatCompletions(p) => p.dialect().name(),
            ProviderClient::GenerateContent(p) => p.dialect().name(),
            ProviderClient::Stub(_) => "stub",
        }
    }
}

#[async_trait]
impl AnswerProvider for ProviderClient {
    fn identifier(&self) -> &str {
        match self {
            ProviderClient::ChatCompletions(p) => &p.config().identifier,
            ProviderClient::GenerateContent(p) => &p.config().identifier,
            ProviderClient::Stub(_) => stub::STUB_IDENTIFIER,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            ProviderClient::ChatCompletions(p) => &p.config().model,
            ProviderClient::GenerateContent(p) => &p.config().model,
            ProviderClient::Stub(_) => stub::STUB_MODEL,
        }
    }

    async fn call(&self, prompt: &str) -> ProviderCallOutcome {
        match self {
            ProviderClient::ChatCompletions(p) => p.call(prompt).await,
            ProviderClient::GenerateContent(p) => p.call(prompt).await,
            ProviderClient::Stub(p) => p.call(prompt),
        }
    }
}
