use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in tutorbot-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// A non-fatal problem with the name -> session identifier mapping file.
///
/// Identity store failures never abort the interactive flow. They are logged
/// and handed back as a warning; lookups degrade to "absent".
#[derive(Debug, Error)]
pub enum IdentityWarning {
    #[error("could not read identity file: {0}")]
    Read(String),

    #[error("identity file is not valid JSON: {0}")]
    Parse(String),

    #[error("could not write identity file: {0}")]
    Write(String),
}

/// Startup configuration problems. Fatal: nothing is served.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{0}'")]
    Missing(&'static str),

    #[error("invalid value for '{key}': {message}")]
    Invalid { key: &'static str, message: String },
}

/// Errors surfaced by the session controller and conversation orchestrator.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("display name must not be empty")]
    InvalidName,

    #[error("history storage failed: {0}")]
    Storage(#[from] RepositoryError),

    /// The response generator failed. The human message of this turn may
    /// already be persisted with no assistant reply following it.
    #[error("turn incomplete: response generation failed: {0}")]
    Generation(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Missing("TUTORBOT_API_KEY");
        assert_eq!(err.to_string(), "missing required setting 'TUTORBOT_API_KEY'");
    }

    #[test]
    fn test_chat_error_from_llm_error() {
        let err: ChatError = LlmError::AuthenticationFailed.into();
        assert!(matches!(err, ChatError::Generation(_)));
        assert!(err.to_string().starts_with("turn incomplete"));
    }

    #[test]
    fn test_chat_error_from_repository_error() {
        let err: ChatError = RepositoryError::Connection.into();
        assert!(matches!(err, ChatError::Storage(RepositoryError::Connection)));
    }
}
