//! Question store port
//!
//! Durable question → answer records. The store is owned by the
//! administrative subsystem; the resolver only reads by text and inserts
//! freshly resolved answers.

use async_trait::async_trait;
use qbank_domain::{NewStoredAnswer, StoredAnswer};
use thiserror::Error;

/// Errors reported by store adapters
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Read/insert access to stored answers.
///
/// Each call is a single request/response; the resolver never retries.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Find the record for an exact question text
    async fn find_by_text(&self, question_text: &str) -> Result<Option<StoredAnswer>, StoreError>;

    /// Insert a record, returning it with its assigned id and timestamp
    async fn insert(&self, record: NewStoredAnswer) -> Result<StoredAnswer, StoreError>;
}
