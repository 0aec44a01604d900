//! Resolution result types
//!
//! - [`ResolutionResult`] - outcome of one `resolve` call
//! - [`AnswerOrigin`] - which tier produced the answer
//! - [`ResponseEnvelope`] - the `{code, data, msg, source}` shape consumed by API layers

use serde::{Deserialize, Serialize};

/// Whether an answer was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Hit,
    NotFound,
}

/// The tier that produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrigin {
    Cache,
    Store,
    Provider,
    None,
}

impl AnswerOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOrigin::Cache => "cache",
            AnswerOrigin::Store => "store",
            AnswerOrigin::Provider => "provider",
            AnswerOrigin::None => "none",
        }
    }

    /// Source label used by the response envelope
    pub fn source_label(&self) -> &'static str {
        match self {
            AnswerOrigin::Cache => "cache",
            AnswerOrigin::Store => "database",
            AnswerOrigin::Provider => "ai",
            AnswerOrigin::None => "none",
        }
    }

    /// Human-readable message used by the response envelope
    pub fn message(&self) -> &'static str {
        match self {
            AnswerOrigin::Cache => "缓存命中",
            AnswerOrigin::Store => "本地数据库",
            AnswerOrigin::Provider => "AI回答",
            AnswerOrigin::None => "未找到答案",
        }
    }
}

impl std::fmt::Display for AnswerOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of resolving one question.
///
/// Construct through [`ResolutionResult::hit`] or [`ResolutionResult::not_found`]
/// so that `answer` is present exactly when `status` is `Hit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    status: ResolutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    origin: AnswerOrigin,
}

impl ResolutionResult {
    /// A hit from the given tier.
    ///
    /// A blank answer is never a hit; it collapses to `not_found`.
    pub fn hit(answer: impl Into<String>, origin: AnswerOrigin) -> Self {
        let answer = answer.into();
        if answer.trim().is_empty() || origin == AnswerOrigin::None {
            return Self::not_found();
        }
        Self {
            status: ResolutionStatus::Hit,
            answer: Some(answer),
            origin,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: ResolutionStatus::NotFound,
            answer: None,
            origin: AnswerOrigin::None,
        }
    }

    pub fn status(&self) -> ResolutionStatus {
        self.status
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn origin(&self) -> AnswerOrigin {
        self.origin
    }

    pub fn is_hit(&self) -> bool {
        self.status == ResolutionStatus::Hit
    }

    /// Map onto the API response envelope.
    pub fn to_envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope {
            code: if self.is_hit() { 1 } else { 0 },
            data: self.answer.clone(),
            msg: self.origin.message().to_string(),
            source: self.origin.source_label().to_string(),
        }
    }
}

/// Response envelope: `code=1` for hit, `code=0` for not found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub code: u8,
    pub data: Option<String>,
    pub msg: String,
    pub source: String,
}
