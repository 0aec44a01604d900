//! Configuration file loading for qbank
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `QBANK_*` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./qbank.toml` or `./.qbank.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/qbank/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAiConfig, FileCacheConfig, FileConfig, FileDatabaseConfig,
    FileLoggingConfig, FileProviderConfig, FileResolverConfig,
};
pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX};
