//! HTTP request handlers for the REST API.

pub mod chat;
pub mod session;

use tutorbot_types::session::SessionId;

use crate::http::error::AppError;

/// Parse a session id from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_session_id(s: &str) -> Result<SessionId, AppError> {
    s.parse::<SessionId>()
        .map_err(|_| AppError::Validation(format!("Invalid session id: {s}")))
}
