//! CLI command definitions

use clap::{Parser, ValueEnum};
use qbank_domain::QuestionKind;
use std::path::PathBuf;

/// Output format for resolution results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable summary
    Text,
    /// The `{code, data, msg, source}` response envelope
    Json,
}

/// CLI arguments for qbank
#[derive(Parser, Debug)]
#[command(name = "qbank")]
#[command(author, version, about = "Answer quiz questions from cache, store, or an LLM provider")]
#[command(long_about = r#"
qbank resolves a question to an answer through three tiers:

1. Cache: in-process memory or Redis
2. Store: the persistent question bank (SQLite)
3. Provider: an LLM endpoint, consulted only when both tiers miss

Provider answers are written back to the store and the cache. When the
selected provider is missing, disabled or has no usable API key, an offline
stand-in replies with a placeholder answer that is never saved.

Configuration files are loaded from (in priority order):
1. QBANK_* environment variables
2. --config <path>     Explicit config file
3. ./qbank.toml        Project-level config
4. ~/.config/qbank/config.toml   Global config

Example:
  qbank "中国的首都是哪里？"
  qbank "下列哪个是水果？" --options "A. 白菜 B. 苹果 C. 土豆" --kind single
  qbank "地球是圆的" --kind judgement --output json
"#)]
pub struct Cli {
    /// The question to resolve (not required with --show-config)
    pub question: Option<String>,

    /// Answer options, e.g. "A. 北京 B. 上海"
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub options: String,

    /// Question kind
    #[arg(short, long, default_value = "single")]
    pub kind: QuestionKind,

    /// Provider identifier (defaults to ai.default_provider)
    #[arg(short, long, value_name = "NAME")]
    pub provider: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
