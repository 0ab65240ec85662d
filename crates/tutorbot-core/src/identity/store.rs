//! IdentityStore trait definition.

use tutorbot_types::error::IdentityWarning;
use tutorbot_types::session::SessionId;

/// Durable name -> session identifier mapping.
///
/// Failures are soft by contract: implementations log them and report them
/// as an [`IdentityWarning`] (on `register`) or as `None` (on `lookup`).
/// Neither method may panic or abort the caller's flow.
pub trait IdentityStore: Send + Sync {
    /// Store `name -> session_id`, replacing any previous mapping for the
    /// exact same (case-sensitive) name. Persisted before returning.
    fn register(
        &self,
        name: &str,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<(), IdentityWarning>> + Send;

    /// Return the identifier currently registered under `name`.
    ///
    /// `None` when the name was never registered or the store is unreadable.
    fn lookup(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Option<SessionId>> + Send;
}
