//! In-memory question store (tests and `database.url = "memory"`).

use async_trait::async_trait;
use chrono::Utc;
use qbank_application::ports::question_store::{QuestionStore, StoreError};
use qbank_domain::{NewStoredAnswer, StoredAnswer};
use tokio::sync::RwLock;

/// Append-only list of records; lookups return the earliest match.
#[derive(Default)]
pub struct InMemoryQuestionStore {
    records: RwLock<Vec<StoredAnswer>>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with records (ids assigned in order).
    pub fn with_records(records: impl IntoIterator<Item = NewStoredAnswer>) -> Self {
        let now = Utc::now();
        let records = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.into_stored(i as i64 + 1, now))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn find_by_text(&self, question_text: &str) -> Result<Option<StoredAnswer>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.question_text == question_text)
            .cloned())
    }

    async fn insert(&self, record: NewStoredAnswer) -> Result<StoredAnswer, StoreError> {
        let mut records = self.records.write().await;
        let id = records.last().map_or(1, |last| last.id + 1);
        let stored = record.into_stored(id, Utc::now());
        records.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbank_domain::{QuestionKind, ResolutionRequest};

    fn record(question: &str, answer: &str) -> NewStoredAnswer {
        let request = ResolutionRequest::new(question, "", QuestionKind::Single).unwrap();
        NewStoredAnswer::from_request(&request, answer)
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = InMemoryQuestionStore::new();
        let first = store.insert(record("q1", "a1")).await.unwrap();
        let second = store.insert(record("q2", "a2")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_by_exact_text() {
        let store = InMemoryQuestionStore::with_records([record("中国的首都是哪里？", "北京")]);
        let found = store.find_by_text("中国的首都是哪里？").await.unwrap().unwrap();
        assert_eq!(found.answer, "北京");
        assert!(store.find_by_text("中国的首都").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicates_return_earliest() {
        let store = InMemoryQuestionStore::new();
        store.insert(record("q", "first")).await.unwrap();
        store.insert(record("q", "second")).await.unwrap();
        let found = store.find_by_text("q").await.unwrap().unwrap();
        assert_eq!(found.answer, "first");
    }
}
