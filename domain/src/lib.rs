//! Domain layer for qbank
//!
//! This crate contains the value objects and pure logic of the answer
//! resolver. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Lookaside resolution
//!
//! A question is answered from the cheapest tier that knows it:
//!
//! - **Cache**: in-process or networked key/value tier
//! - **Store**: durable question → answer records
//! - **Provider**: a billed inference endpoint, consulted only on a double miss
//!
//! ## Normalization
//!
//! - [`answer::parsing`]: recovers answer text from loosely formatted replies
//! - [`answer::matching`]: restores `"A. content"` form against the options

pub mod answer;
pub mod core;
pub mod prompt;
pub mod providers;
pub mod question;

// Re-export commonly used types
pub use answer::{
    MULTI_ANSWER_SEPARATOR, MatchKind, OptionEntry, OptionMatch, ParseStrategy, ParsedAnswer,
    match_option, match_option_detailed, parse_answer, parse_answer_detailed,
};
pub use core::{error::DomainError, string::preview};
pub use prompt::PromptTemplate;
pub use providers::{AiSettings, ProviderCallOutcome, ProviderConfig, ProviderDialect};
pub use question::{
    kind::QuestionKind,
    request::{MAX_OPTIONS_CHARS, MAX_QUESTION_CHARS, ResolutionRequest},
    result::{AnswerOrigin, ResolutionResult, ResolutionStatus, ResponseEnvelope},
    stored::{NewStoredAnswer, StoredAnswer},
};
