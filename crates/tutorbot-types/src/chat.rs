//! Conversation history types for Tutorbot.
//!
//! These types model the append-only message log kept per session:
//! the speaker role, a persisted message with its ordinal position, and the
//! JSON envelope written into the `message` column of the history table.

use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// Who authored a message in the conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Human,
    Assistant,
}

/// A single persisted message within a session's history.
///
/// `ordinal` is the storage-assigned auto-increment key. It is unique across
/// all sessions and strictly increasing in append order; it says nothing
/// about the number of messages in any one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub ordinal: i64,
    pub session_id: SessionId,
    pub role: MessageRole,
    pub content: String,
}

/// Role tag used inside the stored JSON envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StoredKind {
    Human,
    Ai,
}

/// Payload of the stored JSON envelope. Unknown fields are ignored so rows
/// written by other tools with extra metadata still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredData {
    content: String,
}

/// The encoding of role + content kept in the `message` column.
///
/// ```json
/// {"type": "human", "data": {"content": "What is overfitting?"}}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(rename = "type")]
    kind: StoredKind,
    data: StoredData,
}

impl StoredMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        let kind = match role {
            MessageRole::Human => StoredKind::Human,
            MessageRole::Assistant => StoredKind::Ai,
        };
        Self {
            kind,
            data: StoredData {
                content: content.into(),
            },
        }
    }

    pub fn role(&self) -> MessageRole {
        match self.kind {
            StoredKind::Human => MessageRole::Human,
            StoredKind::Ai => MessageRole::Assistant,
        }
    }

    pub fn into_content(self) -> String {
        self.data.content
    }

    /// Serialize to the string written into the history table.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a `message` column value.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
