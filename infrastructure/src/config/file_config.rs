//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the settings types the
//! adapters and the resolver consume.

use crate::cache::{CacheBackendKind, CacheSettings, DEFAULT_KEY_PREFIX};
use qbank_application::ResolverParams;
use qbank_domain::{AiSettings, ProviderConfig, ProviderDialect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    ZeroValue { field: String },

    #[error("{field} cannot be empty")]
    EmptyValue { field: String },

    #[error("{field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub ai: FileAiConfig,
    pub cache: FileCacheConfig,
    pub database: FileDatabaseConfig,
    pub resolver: FileResolverConfig,
    pub logging: FileLoggingConfig,
}

/// `[ai]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAiConfig {
    /// Provider used when the caller does not name one
    pub default_provider: String,
    /// Default per-attempt timeout in seconds
    pub timeout: u64,
    /// Default total attempts per call
    pub max_retries: u32,
    pub providers: BTreeMap<String, FileProviderConfig>,
}

impl Default for FileAiConfig {
    fn default() -> Self {
        Self {
            default_provider: "siliconflow".to_string(),
            timeout: 30,
            max_retries: 3,
            providers: BTreeMap::new(),
        }
    }
}

/// `[ai.providers.<id>]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Display name (default: the identifier)
    pub name: Option<String>,
    pub enabled: bool,
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Overrides `ai.timeout`
    pub timeout: Option<u64>,
    /// Overrides `ai.max_retries`
    pub max_retries: Option<u32>,
    /// `chat_completions` or `generate_content`; inferred from the id when unset
    pub dialect: Option<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            name: None,
            enabled: true,
            api_key: String::new(),
            api_url: String::new(),
            model: String::new(),
            max_tokens: 512,
            temperature: 0.1,
            timeout: None,
            max_retries: None,
            dialect: None,
        }
    }
}

/// `[cache]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// `memory` or `redis`
    pub backend: String,
    /// Entry lifetime in seconds
    pub ttl: u64,
    pub redis_url: String,
    pub key_prefix: String,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            ttl: 3600,
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// `[database]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatabaseConfig {
    /// `sqlite://<path>` or `memory`
    pub url: String,
}

impl Default for FileDatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://question_bank.db".to_string(),
        }
    }
}

/// `[resolver]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResolverConfig {
    /// Share one provider call between concurrent identical questions
    pub coalesce_in_flight: bool,
    /// Rewrite provider answers into `"<letter>. <content>"` form
    pub match_options: bool,
}

impl Default for FileResolverConfig {
    fn default() -> Self {
        Self {
            coalesce_in_flight: false,
            match_options: true,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `qbank=debug`
    pub level: Option<String>,
    /// Diagnostic log file (in addition to stderr)
    pub file: Option<String>,
    /// JSONL file receiving resolution events
    pub events_file: Option<String>,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.ai.timeout == 0 {
            return Err(zero("ai.timeout"));
        }
        if self.ai.max_retries == 0 {
            return Err(zero("ai.max_retries"));
        }
        if self.ai.default_provider.trim().is_empty() {
            return Err(empty("ai.default_provider"));
        }

        for (id, provider) in &self.ai.providers {
            let field = |name: &str| format!("ai.providers.{}.{}", id, name);

            if provider.timeout == Some(0) {
                return Err(zero(&field("timeout")));
            }
            if provider.max_retries == Some(0) {
                return Err(zero(&field("max_retries")));
            }
            if let Some(dialect) = &provider.dialect {
                dialect.parse::<ProviderDialect>().map_err(|message| {
                    ConfigValidationError::InvalidValue {
                        field: field("dialect"),
                        message,
                    }
                })?;
            }
            if provider.enabled {
                if provider.api_url.trim().is_empty() {
                    return Err(empty(&field("api_url")));
                }
                if provider.model.trim().is_empty() {
                    return Err(empty(&field("model")));
                }
            }
        }

        if self.cache.ttl == 0 {
            return Err(zero("cache.ttl"));
        }
        self.cache_backend()?;

        if self.database.url.trim().is_empty() {
            return Err(empty("database.url"));
        }

        Ok(())
    }

    /// Provider snapshot handed to the provider client.
    pub fn to_ai_settings(&self) -> Result<AiSettings, ConfigValidationError> {
        let mut settings = AiSettings::new(self.ai.default_provider.trim());

        for (id, file) in &self.ai.providers {
            let mut config = ProviderConfig::new(id.as_str(), file.api_url.trim(), file.model.trim())
                .with_display_name(file.name.clone().unwrap_or_else(|| id.clone()))
                .with_enabled(file.enabled)
                .with_credential(file.api_key.trim())
                .with_max_output_tokens(file.max_tokens)
                .with_temperature(file.temperature)
                .with_timeout_seconds(file.timeout.unwrap_or(self.ai.timeout))
                .with_max_retries(file.max_retries.unwrap_or(self.ai.max_retries));

            if let Some(dialect) = &file.dialect {
                let dialect = dialect.parse::<ProviderDialect>().map_err(|message| {
                    ConfigValidationError::InvalidValue {
                        field: format!("ai.providers.{}.dialect", id),
                        message,
                    }
                })?;
                config = config.with_dialect(dialect);
            }

            settings = settings.with_provider(config);
        }

        Ok(settings)
    }

    pub fn to_cache_settings(&self) -> Result<CacheSettings, ConfigValidationError> {
        Ok(CacheSettings {
            backend: self.cache_backend()?,
            ttl: Duration::from_secs(self.cache.ttl),
            redis_url: self.cache.redis_url.clone(),
            key_prefix: self.cache.key_prefix.clone(),
        })
    }

    pub fn to_resolver_params(&self) -> ResolverParams {
        ResolverParams::default()
            .with_coalesce_in_flight(self.resolver.coalesce_in_flight)
            .with_match_options(self.resolver.match_options)
    }

    fn cache_backend(&self) -> Result<CacheBackendKind, ConfigValidationError> {
        self.cache
            .backend
            .parse()
            .map_err(|message| ConfigValidationError::InvalidValue {
                field: "cache.backend".to_string(),
                message,
            })
    }
}

fn zero(field: &str) -> ConfigValidationError {
    ConfigValidationError::ZeroValue {
        field: field.to_string(),
    }
}

fn empty(field: &str) -> ConfigValidationError {
    ConfigValidationError::EmptyValue {
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[ai]
default_provider = "siliconflow"
timeout = 20
max_retries = 4

[ai.providers.siliconflow]
name = "SiliconFlow"
api_key = "sk-abc"
api_url = "https://api.siliconflow.cn/v1/chat/completions"
model = "Qwen/Qwen2.5-7B-Instruct"

[ai.providers.google]
name = "Google Gemini"
enabled = false
api_key = "YOUR_GOOGLE_KEY"
api_url = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
model = "gemini-1.5-flash"
timeout = 60
max_retries = 1

[cache]
backend = "redis"
ttl = 600

[database]
url = "memory"

[resolver]
coalesce_in_flight = true

[logging]
level = "debug"
events_file = "logs/events.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.ai.providers.len(), 2);
        assert_eq!(config.cache.backend, "redis");
        assert_eq!(config.cache.key_prefix, "qbank:answer:");
        assert!(config.resolver.coalesce_in_flight);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert!(config.logging.file.is_none());

        let settings = config.to_ai_settings().unwrap();
        let silicon = settings.default_config().unwrap();
        assert_eq!(silicon.display_name, "SiliconFlow");
        assert_eq!(silicon.request_timeout_seconds, 20);
        assert_eq!(silicon.max_retries, 4);
        assert_eq!(silicon.max_output_tokens, 512);
        assert_eq!(silicon.dialect, ProviderDialect::ChatCompletions);

        let google = settings.get("google").unwrap();
        assert!(!google.enabled);
        assert_eq!(google.request_timeout_seconds, 60);
        assert_eq!(google.max_retries, 1);
        assert_eq!(google.dialect, ProviderDialect::GenerateContent);

        let cache = config.to_cache_settings().unwrap();
        assert_eq!(cache.backend, CacheBackendKind::Redis);
        assert_eq!(cache.ttl, Duration::from_secs(600));
        assert!(config.to_resolver_params().coalesce_in_flight);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ai.default_provider, "siliconflow");
        assert_eq!(config.ai.timeout, 30);
        assert_eq!(config.cache.ttl, 3600);
        assert_eq!(config.database.url, "sqlite://question_bank.db");
        assert!(config.to_ai_settings().unwrap().providers.is_empty());
        assert!(config.to_resolver_params().match_options);
    }

    #[test]
    fn test_explicit_dialect() {
        let toml_str = r#"
[ai.providers.proxy]
api_key = "k"
api_url = "https://proxy.example/generate"
model = "gemini"
dialect = "generate_content"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let settings = config.to_ai_settings().unwrap();
        assert_eq!(
            settings.get("proxy").unwrap().dialect,
            ProviderDialect::GenerateContent
        );
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = FileConfig::default();
        config.ai.timeout = 0;
        assert_eq!(config.validate(), Err(zero("ai.timeout")));

        let mut config = FileConfig::default();
        config.cache.ttl = 0;
        assert_eq!(config.validate(), Err(zero("cache.ttl")));

        let mut config = FileConfig::default();
        config.ai.max_retries = 0;
        assert_eq!(config.validate(), Err(zero("ai.max_retries")));
    }

    #[test]
    fn test_validate_enabled_provider_needs_url_and_model() {
        let mut config = FileConfig::default();
        config.ai.providers.insert(
            "openai".to_string(),
            FileProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions".to_string(),
                ..FileProviderConfig::default()
            },
        );
        assert_eq!(
            config.validate(),
            Err(empty("ai.providers.openai.model"))
        );

        config.ai.providers.get_mut("openai").unwrap().enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_names() {
        let mut config = FileConfig::default();
        config.cache.backend = "memcached".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidValue { .. })
        ));

        let mut config = FileConfig::default();
        config.ai.providers.insert(
            "x".to_string(),
            FileProviderConfig {
                enabled: false,
                dialect: Some("soap".to_string()),
                ..FileProviderConfig::default()
            },
        );
        assert!(config.validate().is_err());
        assert!(config.to_ai_settings().is_err());
    }
}
