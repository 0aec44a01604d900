//! Per-attempt provider failures

use thiserror::Error;

/// Why one HTTP attempt against a provider failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    /// 2xx reply without the expected field path
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// The request could not be built (bad endpoint URL, client setup)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Timeouts, non-2xx statuses and transport errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Timeout | ProviderError::Status { .. } | ProviderError::Transport(_)
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_builder() {
            ProviderError::InvalidRequest(e.to_string())
        } else if e.is_decode() {
            ProviderError::UnexpectedShape(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}
