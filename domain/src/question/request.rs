//! Resolution request value object

use super::kind::QuestionKind;
use crate::core::error::DomainError;
use serde::Serialize;

/// Maximum question length in characters
pub const MAX_QUESTION_CHARS: usize = 500;

/// Maximum options length in characters
pub const MAX_OPTIONS_CHARS: usize = 1000;

/// A validated request to resolve one question (Value Object)
///
/// The question text is trimmed on construction; options are kept raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRequest {
    question_text: String,
    options_text: String,
    question_kind: QuestionKind,
}

impl ResolutionRequest {
    /// Validate and build a request.
    pub fn new(
        question_text: impl AsRef<str>,
        options_text: impl Into<String>,
        question_kind: QuestionKind,
    ) -> Result<Self, DomainError> {
        let question_text = question_text.as_ref().trim();
        if question_text.is_empty() {
            return Err(DomainError::EmptyQuestion);
        }

        let len = question_text.chars().count();
        if len > MAX_QUESTION_CHARS {
            return Err(DomainError::QuestionTooLong {
                len,
                max: MAX_QUESTION_CHARS,
            });
        }

        let options_text = options_text.into();
        let options_len = options_text.chars().count();
        if options_len > MAX_OPTIONS_CHARS {
            return Err(DomainError::OptionsTooLong {
                len: options_len,
                max: MAX_OPTIONS_CHARS,
            });
        }

        Ok(Self {
            question_text: question_text.to_string(),
            options_text,
            question_kind,
        })
    }

    /// Build a request with no options and the default kind.
    pub fn question(question_text: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::new(question_text, String::new(), QuestionKind::default())
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options_text(&self) -> &str {
        &self.options_text
    }

    pub fn question_kind(&self) -> QuestionKind {
        self.question_kind
    }

    /// Whether any non-blank options were supplied
    pub fn has_options(&self) -> bool {
        !self.options_text.trim().is_empty()
    }
}
