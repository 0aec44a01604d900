//! Question kind value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The shape of answer a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// One correct option
    #[default]
    Single,
    /// Several correct options, joined with `###`
    Multiple,
    /// True/false (`对` / `错`)
    Judgement,
    /// Fill in the blank(s), joined with `###`
    Fill,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Single => "single",
            QuestionKind::Multiple => "multiple",
            QuestionKind::Judgement => "judgement",
            QuestionKind::Fill => "fill",
        }
    }

    pub fn all() -> [QuestionKind; 4] {
        [
            QuestionKind::Single,
            QuestionKind::Multiple,
            QuestionKind::Judgement,
            QuestionKind::Fill,
        ]
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(QuestionKind::Single),
            "multiple" => Ok(QuestionKind::Multiple),
            "judgement" => Ok(QuestionKind::Judgement),
            "fill" => Ok(QuestionKind::Fill),
            other => Err(DomainError::UnknownQuestionKind(other.to_string())),
        }
    }
}
