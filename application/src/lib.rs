//! Application layer for qbank
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ResolverParams;
pub use ports::{
    answer_cache::AnswerCache,
    answer_provider::AnswerProvider,
    question_store::{QuestionStore, StoreError},
    resolution_observer::{NoResolutionObserver, ResolutionEvent, ResolutionObserver},
};
pub use use_cases::provider_answer::{ProviderAnswerService, ProviderLookup};
pub use use_cases::resolve_question::ResolveQuestionUseCase;
