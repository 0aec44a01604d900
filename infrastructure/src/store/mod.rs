//! Question store adapters.
//!
//! - [`InMemoryQuestionStore`] - process-local, for tests and `database.url = "memory"`
//! - [`SqliteQuestionStore`] - the `question_answer` table (feature "sqlite")

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::InMemoryQuestionStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteQuestionStore;

use qbank_application::ports::question_store::{QuestionStore, StoreError};
use std::sync::Arc;
use tracing::info;

/// `database.url` value selecting the in-memory store
pub const MEMORY_DATABASE_URL: &str = "memory";

/// Open the store named by `database_url`.
pub async fn open_question_store(database_url: &str) -> Result<Arc<dyn QuestionStore>, StoreError> {
    let url = database_url.trim();
    if url.eq_ignore_ascii_case(MEMORY_DATABASE_URL) {
        info!("Using in-memory question store");
        return Ok(Arc::new(InMemoryQuestionStore::new()));
    }

    if url.starts_with("sqlite:") {
        return open_sqlite(url).await;
    }

    Err(StoreError::Unavailable(format!(
        "unsupported database url: {}",
        url
    )))
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(url: &str) -> Result<Arc<dyn QuestionStore>, StoreError> {
    Ok(Arc::new(SqliteQuestionStore::connect(url).await?))
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(url: &str) -> Result<Arc<dyn QuestionStore>, StoreError> {
    Err(StoreError::Unavailable(format!(
        "{}: sqlite support not compiled in (enable the \"sqlite\" feature)",
        url
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_question_store("memory").await.unwrap();
        assert!(store.find_by_text("q").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_unknown_scheme() {
        let err = open_question_store("postgres://localhost/qbank")
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("unsupported database url"));
    }
}
