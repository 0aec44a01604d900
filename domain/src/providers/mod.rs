//! Provider configuration types (provider-neutral, serde-free).
//!
//! These types define the shape of provider settings without depending
//! on any serialization format (TOML, JSON, etc.). The infrastructure
//! config loader converts its file representation into an [`AiSettings`]
//! snapshot, which is then handed to the provider factory by value.

mod outcome;

pub use outcome::ProviderCallOutcome;

use std::collections::BTreeMap;
use std::time::Duration;

/// Credential prefix used by config templates for "not filled in yet".
pub const PLACEHOLDER_CREDENTIAL_PREFIX: &str = "YOUR_";

/// Identifier of the one provider that speaks the generate-content dialect
/// when no dialect is configured explicitly.
pub const GENERATE_CONTENT_PROVIDER_ID: &str = "google";

/// Request/response shape spoken to an inference endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderDialect {
    /// OpenAI-compatible `/chat/completions`
    ChatCompletions,
    /// `generateContent` style: credential in the query string,
    /// `contents[].parts[].text` request body
    GenerateContent,
}

impl ProviderDialect {
    /// Infer the dialect from a provider identifier.
    pub fn infer(identifier: &str) -> Self {
        if identifier.eq_ignore_ascii_case(GENERATE_CONTENT_PROVIDER_ID) {
            ProviderDialect::GenerateContent
        } else {
            ProviderDialect::ChatCompletions
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderDialect::ChatCompletions => "chat_completions",
            ProviderDialect::GenerateContent => "generate_content",
        }
    }
}

impl std::str::FromStr for ProviderDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "chat_completions" | "openai" => Ok(ProviderDialect::ChatCompletions),
            "generate_content" | "gemini" => Ok(ProviderDialect::GenerateContent),
            other => Err(format!("unknown provider dialect: {}", other)),
        }
    }
}

/// Settings for one inference provider. Read-only to the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Key in the provider map (e.g. "siliconflow", "google")
    pub identifier: String,
    /// Human-readable name used in log lines
    pub display_name: String,
    pub enabled: bool,
    /// API key; bearer token or query parameter depending on dialect
    pub credential: String,
    pub endpoint_url: String,
    pub model: String,
    /// Max tokens per response (default: 512).
    pub max_output_tokens: u32,
    /// Sampling temperature (default: 0.1).
    pub temperature: f64,
    /// Per-attempt timeout in seconds (default: 30).
    pub request_timeout_seconds: u64,
    /// Total attempts per call, including the first (default: 3).
    pub max_retries: u32,
    pub dialect: ProviderDialect,
}

impl ProviderConfig {
    /// Create a config with defaults for everything but identity and endpoint.
    pub fn new(
        identifier: impl Into<String>,
        endpoint_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let identifier = identifier.into();
        Self {
            display_name: identifier.clone(),
            dialect: ProviderDialect::infer(&identifier),
            identifier,
            enabled: true,
            credential: String::new(),
            endpoint_url: endpoint_url.into(),
            model: model.into(),
            max_output_tokens: 512,
            temperature: 0.1,
            request_timeout_seconds: 30,
            max_retries: 3,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = credential.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_dialect(mut self, dialect: ProviderDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Credential is non-blank and not a template placeholder.
    pub fn has_usable_credential(&self) -> bool {
        let credential = self.credential.trim();
        !credential.is_empty() && !credential.starts_with(PLACEHOLDER_CREDENTIAL_PREFIX)
    }

    /// Why this provider cannot be called, if it cannot.
    pub fn unusable_reason(&self) -> Option<String> {
        if !self.enabled {
            Some(format!("provider '{}' is disabled", self.identifier))
        } else if !self.has_usable_credential() {
            Some(format!(
                "provider '{}' has no usable credential",
                self.identifier
            ))
        } else {
            None
        }
    }
}

/// Immutable snapshot of all provider settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiSettings {
    /// Identifier used when a caller does not name a provider.
    pub default_provider: String,
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl AiSettings {
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            default_provider: default_provider.into(),
            providers: BTreeMap::new(),
        }
    }

    pub fn with_provider(mut self, config: ProviderConfig) -> Self {
        self.providers.insert(config.identifier.clone(), config);
        self
    }

    pub fn get(&self, identifier: &str) -> Option<&ProviderConfig> {
        self.providers.get(identifier)
    }

    pub fn default_config(&self) -> Option<&ProviderConfig> {
        self.get(&self.default_provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig::new("siliconflow", "https://example.test/v1/chat/completions", "m")
    }

    #[test]
    fn test_dialect_inference() {
        assert_eq!(
            ProviderDialect::infer("google"),
            ProviderDialect::GenerateContent
        );
        assert_eq!(
            ProviderDialect::infer("siliconflow"),
            ProviderDialect::ChatCompletions
        );
        assert_eq!(config().dialect, ProviderDialect::ChatCompletions);
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!(
            "generate-content".parse::<ProviderDialect>().unwrap(),
            ProviderDialect::GenerateContent
        );
        assert!("soap".parse::<ProviderDialect>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.max_output_tokens, 512);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.display_name, "siliconflow");
    }

    #[test]
    fn test_placeholder_credential_is_unusable() {
        assert!(!config().has_usable_credential());
        assert!(!config().with_credential("YOUR_API_KEY").has_usable_credential());
        assert!(!config().with_credential("   ").has_usable_credential());
        assert!(config().with_credential("sk-123").has_usable_credential());
    }

    #[test]
    fn test_unusable_reason() {
        let disabled = config().with_credential("sk-1").with_enabled(false);
        assert_eq!(
            disabled.unusable_reason().as_deref(),
            Some("provider 'siliconflow' is disabled")
        );
        assert!(config().unusable_reason().unwrap().contains("credential"));
        assert!(config().with_credential("sk-1").unusable_reason().is_none());
    }

    #[test]
    fn test_settings_lookup() {
        let settings = AiSettings::new("siliconflow").with_provider(config());
        assert!(settings.default_config().is_some());
        assert!(settings.get("google").is_none());
    }
}
