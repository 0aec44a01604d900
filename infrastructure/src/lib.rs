//! Infrastructure layer for qbank
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: answer caches, question stores, the inference
//! provider client, configuration file loading and the JSONL event sink.

pub mod cache;
pub mod config;
pub mod logging;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use cache::{
    CacheBackendKind, CacheSettings, FallbackAnswerCache, InMemoryAnswerCache,
    build_answer_cache,
};
pub use config::{ConfigError, ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlResolutionLogger;
pub use providers::{ProviderClient, ProviderError, RetryPolicy, StubProvider};
pub use store::{InMemoryQuestionStore, MEMORY_DATABASE_URL, open_question_store};
