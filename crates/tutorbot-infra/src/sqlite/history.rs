//! SQLite history repository implementation.
//!
//! Implements `HistoryRepository` from `tutorbot-core` on the `message_store`
//! table: one row per message, keyed by an auto-incrementing id that gives the
//! global insertion order. Loads run on the reader pool, appends and resets on
//! the single writer.

use sqlx::Row;
use tracing::{debug, info};

use tutorbot_core::history::repository::HistoryRepository;
use tutorbot_types::chat::{ChatMessage, MessageRole, StoredMessage};
use tutorbot_types::error::RepositoryError;
use tutorbot_types::session::SessionId;

use super::pool::{map_sqlx_error, DatabasePool};

const CREATE_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS message_store (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    message TEXT NOT NULL
)"#;

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_message_store_session ON message_store (session_id)";

/// SQLite-backed implementation of `HistoryRepository`.
#[derive(Clone)]
pub struct SqliteHistoryRepository {
    pool: DatabasePool,
}

impl SqliteHistoryRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MessageRow {
    id: i64,
    session_id: String,
    message: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            message: row.try_get("message")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let session_id = self
            .session_id
            .parse::<SessionId>()
            .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))?;
        let stored = StoredMessage::decode(&self.message).map_err(|e| {
            RepositoryError::Query(format!("invalid message envelope in row {}: {e}", self.id))
        })?;

        Ok(ChatMessage {
            ordinal: self.id,
            session_id,
            role: stored.role(),
            content: stored.into_content(),
        })
    }
}

impl HistoryRepository for SqliteHistoryRepository {
    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;
        sqlx::query(CREATE_INDEX)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        debug!("message_store schema ready");
        Ok(())
    }

    async fn append(
        &self,
        session_id: &SessionId,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let envelope = StoredMessage::new(role, content)
            .encode()
            .map_err(|e| RepositoryError::Query(format!("serialize message: {e}")))?;

        let result = sqlx::query("INSERT INTO message_store (session_id, message) VALUES (?, ?)")
            .bind(session_id.to_string())
            .bind(&envelope)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(ChatMessage {
            ordinal: result.last_insert_rowid(),
            session_id: *session_id,
            role,
            content: content.to_string(),
        })
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, session_id, message FROM message_store
               WHERE session_id = ?
               ORDER BY id ASC"#,
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(r.into_message()?);
        }
        Ok(messages)
    }

    async fn reset(&self) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(map_sqlx_error)?;

        let deleted = sqlx::query("DELETE FROM message_store")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        // Restart the id counter so the next append gets ordinal 1.
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'message_store'")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        info!(deleted, "message history reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> SqliteHistoryRepository {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("history.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Keep the tempdir alive for the test's duration
        std::mem::forget(dir);

        let repo = SqliteHistoryRepository::new(DatabasePool::new(&url).await.unwrap());
        repo.ensure_schema().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_append_and_load_in_order() {
        let repo = test_repo().await;
        let session = SessionId::new();

        let first = repo
            .append(&session, MessageRole::Human, "What is a p-value?")
            .await
            .unwrap();
        let second = repo
            .append(&session, MessageRole::Assistant, "The probability of ...")
            .await
            .unwrap();
        assert!(first.ordinal < second.ordinal);

        let history = repo.load(&session).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], first);
        assert_eq!(history[1], second);
        assert_eq!(history[1].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_interleaved_sessions_stay_separate() {
        let repo = test_repo().await;
        let a = SessionId::new();
        let b = SessionId::new();

        repo.append(&a, MessageRole::Human, "a1").await.unwrap();
        repo.append(&b, MessageRole::Human, "b1").await.unwrap();
        repo.append(&a, MessageRole::Assistant, "a2").await.unwrap();
        repo.append(&b, MessageRole::Assistant, "b2").await.unwrap();

        let history_a = repo.load(&a).await.unwrap();
        let contents: Vec<&str> = history_a.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a1", "a2"]);
        assert!(history_a.iter().all(|m| m.session_id == a));

        let history_b = repo.load(&b).await.unwrap();
        let contents: Vec<&str> = history_b.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["b1", "b2"]);
    }

    #[tokio::test]
    async fn test_load_unknown_session_is_empty() {
        let repo = test_repo().await;
        let history = repo.load(&SessionId::new()).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let repo = test_repo().await;
        let session = SessionId::new();
        repo.append(&session, MessageRole::Human, "kept").await.unwrap();

        repo.ensure_schema().await.unwrap();
        repo.ensure_schema().await.unwrap();

        assert_eq!(repo.load(&session).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_content_is_stored_verbatim() {
        let repo = test_repo().await;
        let session = SessionId::new();
        let content = "  `df.groupby(\"k\")` \u{2014} \"quotes\" and\nnewlines  ";

        repo.append(&session, MessageRole::Assistant, content)
            .await
            .unwrap();

        let history = repo.load(&session).await.unwrap();
        assert_eq!(history[0].content, content);
    }

    #[tokio::test]
    async fn test_rows_use_json_envelope() {
        let repo = test_repo().await;
        let session = SessionId::new();
        repo.append(&session, MessageRole::Assistant, "hi").await.unwrap();

        let (raw,): (String,) = sqlx::query_as("SELECT message FROM message_store")
            .fetch_one(&repo.pool.reader)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["type"], "ai");
        assert_eq!(value["data"]["content"], "hi");
    }

    #[tokio::test]
    async fn test_reset_deletes_everything_and_restarts_ordinals() {
        let repo = test_repo().await;
        let a = SessionId::new();
        let b = SessionId::new();
        repo.append(&a, MessageRole::Human, "one").await.unwrap();
        repo.append(&b, MessageRole::Human, "two").await.unwrap();
        repo.append(&a, MessageRole::Assistant, "three").await.unwrap();

        repo.reset().await.unwrap();

        assert!(repo.load(&a).await.unwrap().is_empty());
        assert!(repo.load(&b).await.unwrap().is_empty());

        let next = repo.append(&a, MessageRole::Human, "again").await.unwrap();
        assert_eq!(next.ordinal, 1);
    }

    #[tokio::test]
    async fn test_reset_on_empty_store() {
        let repo = test_repo().await;
        repo.reset().await.unwrap();
        let first = repo
            .append(&SessionId::new(), MessageRole::Human, "hello")
            .await
            .unwrap();
        assert_eq!(first.ordinal, 1);
    }
}
