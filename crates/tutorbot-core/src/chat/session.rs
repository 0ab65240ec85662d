//! Session controller and per-caller session state.
//!
//! The controller exposes the two entry points the UI layer uses to get a
//! session: start a new one under a display name, or resume the one a name
//! maps to. The result is a [`SessionContext`] the caller owns and passes to
//! every turn; nothing about the "current user" is kept globally.

use tracing::{info, warn};

use tutorbot_types::chat::ChatMessage;
use tutorbot_types::error::{ChatError, IdentityWarning};
use tutorbot_types::session::SessionId;

use crate::history::repository::HistoryRepository;
use crate::identity::store::IdentityStore;

/// The identity a caller chats under: the session id plus the display name.
///
/// Issued by [`SessionController`]; the conversation service only writes
/// history for ids carried by a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session_id: SessionId,
    user_name: String,
}

impl SessionContext {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }
}

/// Result of [`SessionController::start_new_session`].
#[derive(Debug)]
pub struct NewSession {
    pub context: SessionContext,
    /// Always empty for a fresh session.
    pub history: Vec<ChatMessage>,
    /// Set when the name could not be saved. The session is still usable,
    /// but resuming it by name later will not find it.
    pub warning: Option<IdentityWarning>,
}

/// Result of [`SessionController::resume_session`].
#[derive(Debug)]
pub enum ResumedSession {
    Found {
        context: SessionContext,
        history: Vec<ChatMessage>,
    },
    NotFound,
}

/// Creates and resumes sessions.
///
/// Generic over the identity store and history repository so tests can run
/// against in-memory stand-ins.
pub struct SessionController<I: IdentityStore, H: HistoryRepository> {
    identity: I,
    history: H,
}

impl<I: IdentityStore, H: HistoryRepository> SessionController<I, H> {
    pub fn new(identity: I, history: H) -> Self {
        Self { identity, history }
    }

    /// Start a brand-new session under `display_name`.
    ///
    /// A fresh identifier is generated unconditionally. If the name is
    /// already registered, the old mapping is overwritten and the earlier
    /// session can no longer be resumed by name.
    pub async fn start_new_session(&self, display_name: &str) -> Result<NewSession, ChatError> {
        validate_name(display_name)?;

        let session_id = SessionId::new();
        let warning = match self.identity.register(display_name, &session_id).await {
            Ok(()) => None,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Session started without a saved name mapping");
                Some(e)
            }
        };

        info!(session_id = %session_id, "New session started");

        Ok(NewSession {
            context: SessionContext {
                session_id,
                user_name: display_name.to_string(),
            },
            history: Vec::new(),
            warning,
        })
    }

    /// Resume the session currently registered under `display_name`.
    ///
    /// Returns [`ResumedSession::NotFound`] when the name is unknown or the
    /// mapping cannot be read. History load failures are errors.
    pub async fn resume_session(&self, display_name: &str) -> Result<ResumedSession, ChatError> {
        validate_name(display_name)?;

        let Some(session_id) = self.identity.lookup(display_name).await else {
            info!("No session registered for the given name");
            return Ok(ResumedSession::NotFound);
        };

        let history = self.history.load(&session_id).await?;
        info!(session_id = %session_id, messages = history.len(), "Session resumed");

        Ok(ResumedSession::Found {
            context: SessionContext {
                session_id,
                user_name: display_name.to_string(),
            },
            history,
        })
    }

    /// Re-issue a context for an identifier the caller already holds.
    ///
    /// Stateless front ends (the HTTP API) send the id back with every turn.
    /// The id is accepted only while it is the one registered under
    /// `user_name`; anything else yields `None`, and no history may be
    /// written for it.
    pub async fn attach(
        &self,
        session_id: SessionId,
        user_name: &str,
    ) -> Result<Option<SessionContext>, ChatError> {
        validate_name(user_name)?;

        match self.identity.lookup(user_name).await {
            Some(registered) if registered == session_id => Ok(Some(SessionContext {
                session_id,
                user_name: user_name.to_string(),
            })),
            _ => {
                info!(session_id = %session_id, "Session id is not registered under the given name");
                Ok(None)
            }
        }
    }
}

/// The line shown to the learner once a session is active.
pub fn greeting(display_name: &str) -> String {
    format!("Hello, {display_name}! How can I assist you today?")
}

fn validate_name(display_name: &str) -> Result<(), ChatError> {
    if display_name.is_empty() {
        return Err(ChatError::InvalidName);
    }
    Ok(())
}

/// Per-caller session state: `NoSession -> Active`. `Active` is terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    NoSession,
    Active(SessionContext),
}

impl SessionState {
    /// The active context, if any.
    pub fn context(&self) -> Option<&SessionContext> {
        match self {
            SessionState::NoSession => None,
            SessionState::Active(context) => Some(context),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }

    /// Move to `Active`. Returns `false` (and keeps the existing context)
    /// when a session is already active.
    pub fn activate(&mut self, context: SessionContext) -> bool {
        if self.is_active() {
            return false;
        }
        *self = SessionState::Active(context);
        true
    }
}
