//! HistoryRepository trait definition.
//!
//! Append-only message log keyed by session identifier.
//! Follows the RPITIT pattern used by every repository trait in this crate.

use tutorbot_types::chat::{ChatMessage, MessageRole};
use tutorbot_types::error::RepositoryError;
use tutorbot_types::session::SessionId;

/// Repository trait for per-session conversation history.
///
/// Implementations live in tutorbot-infra (e.g., `SqliteHistoryRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait HistoryRepository: Send + Sync {
    /// Create the message table if it does not exist yet.
    ///
    /// Idempotent and additive only: calling it against an existing schema
    /// leaves every row untouched and does not fail.
    fn ensure_schema(
        &self,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append one message to a session's history.
    ///
    /// The new message receives the next ordinal position. Errors are not
    /// retried here.
    fn append(
        &self,
        session_id: &SessionId,
        role: MessageRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Load every message of a session in append order.
    ///
    /// Returns an empty vector when the session has no history.
    fn load(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Delete all messages of all sessions and restart the ordinal counter.
    ///
    /// Administrative only. Destructive, global, and not reversible.
    fn reset(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
