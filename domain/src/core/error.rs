//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Only request validation surfaces as an error; every other failure in the
/// resolution pipeline degrades to a `not_found` result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Question text cannot be empty")]
    EmptyQuestion,

    #[error("Question text is too long: {len} characters (max {max})")]
    QuestionTooLong { len: usize, max: usize },

    #[error("Options text is too long: {len} characters (max {max})")]
    OptionsTooLong { len: usize, max: usize },

    #[error("Unknown question kind: {0}")]
    UnknownQuestionKind(String),
}

impl DomainError {
    /// Check if this error was caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyQuestion
                | DomainError::QuestionTooLong { .. }
                | DomainError::OptionsTooLong { .. }
                | DomainError::UnknownQuestionKind(_)
        )
    }
}
