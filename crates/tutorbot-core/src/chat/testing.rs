//! In-memory stand-ins for the chat module's tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tutorbot_types::chat::{ChatMessage, MessageRole};
use tutorbot_types::error::{IdentityWarning, RepositoryError};
use tutorbot_types::llm::LlmError;
use tutorbot_types::session::SessionId;

use crate::chat::generator::{GenerationRequest, ResponseGenerator};
use crate::history::repository::HistoryRepository;
use crate::identity::store::IdentityStore;

#[derive(Default)]
struct HistoryState {
    rows: Vec<ChatMessage>,
    next_ordinal: i64,
    unreachable: bool,
}

/// Vector-backed history log. Clones share the same log.
#[derive(Clone, Default)]
pub struct InMemoryHistory {
    state: Arc<Mutex<HistoryState>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `RepositoryError::Connection`.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }
}

impl HistoryRepository for InMemoryHistory {
    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn append(
        &self,
        session_id: &SessionId,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.unreachable {
            return Err(RepositoryError::Connection);
        }
        state.next_ordinal += 1;
        let message = ChatMessage {
            ordinal: state.next_ordinal,
            session_id: *session_id,
            role,
            content: content.to_string(),
        };
        state.rows.push(message.clone());
        Ok(message)
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let state = self.state.lock().unwrap();
        if state.unreachable {
            return Err(RepositoryError::Connection);
        }
        Ok(state
            .rows
            .iter()
            .filter(|m| &m.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn reset(&self) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.rows.clear();
        state.next_ordinal = 0;
        Ok(())
    }
}

/// HashMap-backed identity store. Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryIdentity {
    names: Arc<Mutex<HashMap<String, SessionId>>>,
    broken: Arc<Mutex<bool>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreadable/unwritable mapping file.
    pub fn set_broken(&self, broken: bool) {
        *self.broken.lock().unwrap() = broken;
    }
}

impl IdentityStore for InMemoryIdentity {
    async fn register(&self, name: &str, session_id: &SessionId) -> Result<(), IdentityWarning> {
        if *self.broken.lock().unwrap() {
            return Err(IdentityWarning::Write("disk full".to_string()));
        }
        self.names
            .lock()
            .unwrap()
            .insert(name.to_string(), *session_id);
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Option<SessionId> {
        if *self.broken.lock().unwrap() {
            return None;
        }
        self.names.lock().unwrap().get(name).copied()
    }
}

/// Generator that answers `"echo: {prompt}"`, or fails when told to.
#[derive(Default)]
pub struct EchoGenerator {
    failing: Mutex<bool>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl EchoGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: Mutex::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(user_name, history_len)` for every call so far.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ResponseGenerator for EchoGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.user_name.to_string(), request.history.len()));
        if *self.failing.lock().unwrap() {
            return Err(LlmError::Provider {
                message: "upstream unavailable".to_string(),
            });
        }
        Ok(format!("echo: {}", request.prompt))
    }
}
