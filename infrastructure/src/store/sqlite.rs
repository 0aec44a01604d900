//! SQLite question store.
//!
//! Table layout shared with the administrative tooling:
//!
//! ```sql
//! question_answer(id, question, answer, options, type, created_at)
//! ```
//!
//! The schema is created on connect if missing. Uniqueness of `question` is
//! not enforced; lookups return the earliest inserted row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qbank_application::ports::question_store::{QuestionStore, StoreError};
use qbank_domain::{NewStoredAnswer, QuestionKind, StoredAnswer};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::str::FromStr;
use tracing::{debug, info, warn};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS question_answer (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        options TEXT,
        type TEXT,
        created_at TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_question ON question_answer (question)",
    "CREATE INDEX IF NOT EXISTS idx_question_type ON question_answer (question, type)",
];

pub struct SqliteQuestionStore {
    pool: SqlitePool,
}

impl SqliteQuestionStore {
    /// Open (creating if needed) the database at `database_url`,
    /// e.g. `sqlite://question_bank.db`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        Self::connect_with_options(database_url, 5).await
    }

    pub async fn connect_with_options(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("Opened SQLite question store at {}", database_url);
        Ok(store)
    }

    /// Private in-memory database. One connection, since every
    /// `sqlite::memory:` connection is a separate database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect_with_options("sqlite::memory:", 1).await
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;
        }
        Ok(())
    }

    fn row_to_stored(row: &SqliteRow) -> Result<StoredAnswer, StoreError> {
        let corrupt = |e: sqlx::Error| StoreError::Corrupt(e.to_string());

        let kind: Option<String> = row.try_get("type").map_err(corrupt)?;
        let question_kind = match kind.as_deref().map(str::trim) {
            None | Some("") => QuestionKind::default(),
            Some(raw) => QuestionKind::from_str(raw).unwrap_or_else(|_| {
                warn!("Unknown question type '{}' in store, using default", raw);
                QuestionKind::default()
            }),
        };

        let created_at: Option<String> = row.try_get("created_at").map_err(corrupt)?;
        let created_at = created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_default();

        Ok(StoredAnswer {
            id: row.try_get("id").map_err(corrupt)?,
            question_text: row.try_get("question").map_err(corrupt)?,
            answer: row.try_get("answer").map_err(corrupt)?,
            options_text: row
                .try_get::<Option<String>, _>("options")
                .map_err(corrupt)?
                .unwrap_or_default(),
            question_kind,
            created_at,
        })
    }
}

/// Accept RFC 3339 and the `YYYY-MM-DD HH:MM:SS` form older rows use.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[async_trait]
impl QuestionStore for SqliteQuestionStore {
    async fn find_by_text(&self, question_text: &str) -> Result<Option<StoredAnswer>, StoreError> {
        let row = sqlx::query(
            "SELECT id, question, answer, options, type, created_at \
             FROM question_answer WHERE question = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(question_text)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        row.as_ref().map(Self::row_to_stored).transpose()
    }

    async fn insert(&self, record: NewStoredAnswer) -> Result<StoredAnswer, StoreError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO question_answer (question, answer, options, type, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.question_text)
        .bind(&record.answer)
        .bind(&record.options_text)
        .bind(record.question_kind.as_str())
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let id = result.last_insert_rowid();
        debug!("Inserted question_answer #{}", id);
        Ok(record.into_stored(id, created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbank_domain::ResolutionRequest;

    fn record(question: &str, answer: &str, options: &str, kind: QuestionKind) -> NewStoredAnswer {
        let request = ResolutionRequest::new(question, options, kind).unwrap();
        NewStoredAnswer::from_request(&request, answer)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = SqliteQuestionStore::in_memory().await.unwrap();
        let inserted = store
            .insert(record(
                "中国的首都是哪里？",
                "A. 北京",
                "A. 北京 B. 上海",
                QuestionKind::Single,
            ))
            .await
            .unwrap();
        assert!(inserted.id > 0);

        let found = store
            .find_by_text("中国的首都是哪里？")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.answer, "A. 北京");
        assert_eq!(found.options_text, "A. 北京 B. 上海");
        assert_eq!(found.question_kind, QuestionKind::Single);
        assert_eq!(found.created_at.timestamp(), inserted.created_at.timestamp());
    }

    #[tokio::test]
    async fn test_missing_question() {
        let store = SqliteQuestionStore::in_memory().await.unwrap();
        assert!(store.find_by_text("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_earliest_duplicate_wins() {
        let store = SqliteQuestionStore::in_memory().await.unwrap();
        store
            .insert(record("q", "first", "", QuestionKind::Judgement))
            .await
            .unwrap();
        store
            .insert(record("q", "second", "", QuestionKind::Judgement))
            .await
            .unwrap();

        let found = store.find_by_text("q").await.unwrap().unwrap();
        assert_eq!(found.answer, "first");
        assert_eq!(found.question_kind, QuestionKind::Judgement);
    }

    #[tokio::test]
    async fn test_reads_rows_written_by_other_tools() {
        let store = SqliteQuestionStore::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO question_answer (question, answer, options, type, created_at) \
             VALUES ('1+1=?', '2', NULL, NULL, '2024-05-01 08:30:00')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let found = store.find_by_text("1+1=?").await.unwrap().unwrap();
        assert_eq!(found.options_text, "");
        assert_eq!(found.question_kind, QuestionKind::Single);
        assert_eq!(found.created_at.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("bank.db").display());

        {
            let store = SqliteQuestionStore::connect(&url).await.unwrap();
            store
                .insert(record("q", "a", "", QuestionKind::Fill))
                .await
                .unwrap();
            store.pool().close().await;
        }

        let reopened = SqliteQuestionStore::connect(&url).await.unwrap();
        let found = reopened.find_by_text("q").await.unwrap().unwrap();
        assert_eq!(found.question_kind, QuestionKind::Fill);
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert!(parse_timestamp("2024-05-01T08:30:00Z").is_some());
        assert!(parse_timestamp("2024-05-01 08:30:00.123").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
