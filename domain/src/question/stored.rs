//! Stored question/answer records

use super::kind::QuestionKind;
use super::request::ResolutionRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A durable question → answer record, as returned by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub id: i64,
    pub question_text: String,
    pub answer: String,
    pub options_text: String,
    pub question_kind: QuestionKind,
    pub created_at: DateTime<Utc>,
}

/// A record about to be inserted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStoredAnswer {
    pub question_text: String,
    pub answer: String,
    pub options_text: String,
    pub question_kind: QuestionKind,
}

impl NewStoredAnswer {
    /// Record for a freshly resolved request.
    pub fn from_request(request: &ResolutionRequest, answer: impl Into<String>) -> Self {
        Self {
            question_text: request.question_text().to_string(),
            answer: answer.into(),
            options_text: request.options_text().to_string(),
            question_kind: request.question_kind(),
        }
    }

    /// Attach the identity assigned by a store.
    pub fn into_stored(self, id: i64, created_at: DateTime<Utc>) -> StoredAnswer {
        StoredAnswer {
            id,
            question_text: self.question_text,
            answer: self.answer,
            options_text: self.options_text,
            question_kind: self.question_kind,
            created_at,
        }
    }
}
