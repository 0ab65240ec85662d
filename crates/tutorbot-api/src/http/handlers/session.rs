//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions                - Start a new session under a display name
//! - POST /api/v1/sessions/resume         - Resume the session registered under a name
//! - GET  /api/v1/sessions/{id}/messages  - Load a session's history

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use tutorbot_core::chat::session::{greeting, ResumedSession, SessionContext};
use tutorbot_core::history::repository::HistoryRepository;
use tutorbot_types::chat::ChatMessage;
use tutorbot_types::error::ChatError;
use tutorbot_types::session::SessionId;

use crate::http::error::AppError;
use crate::http::handlers::parse_session_id;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for starting or resuming a session.
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub display_name: String,
}

/// A session as returned to the client.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub display_name: String,
    pub greeting: String,
    pub history: Vec<ChatMessage>,
    /// Set when the name mapping could not be saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SessionView {
    fn new(context: &SessionContext, history: Vec<ChatMessage>, warning: Option<String>) -> Self {
        Self {
            session_id: *context.session_id(),
            display_name: context.user_name().to_string(),
            greeting: greeting(context.user_name()),
            history,
            warning,
        }
    }
}

/// POST /api/v1/sessions - Start a new session.
pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let Json(body) = payload?;

    let started = state.sessions.start_new_session(&body.display_name).await?;
    let view = SessionView::new(
        &started.context,
        started.history,
        started.warning.map(|w| w.to_string()),
    );

    let self_link = format!("/api/v1/sessions/{}/messages", view.session_id);
    let resp = ApiResponse::success(view, start).with_link("messages", &self_link);
    Ok(Json(resp))
}

/// POST /api/v1/sessions/resume - Resume a session by display name.
pub async fn resume_session(
    State(state): State<AppState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let Json(body) = payload?;

    match state.sessions.resume_session(&body.display_name).await? {
        ResumedSession::Found { context, history } => {
            let view = SessionView::new(&context, history, None);
            let self_link = format!("/api/v1/sessions/{}/messages", view.session_id);
            let resp = ApiResponse::success(view, start).with_link("messages", &self_link);
            Ok(Json(resp))
        }
        ResumedSession::NotFound => Err(AppError::SessionNotFound),
    }
}

/// GET /api/v1/sessions/{id}/messages - Full history of a session, oldest first.
///
/// An id with no messages yields an empty list.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    let sid = parse_session_id(&session_id)?;

    let messages = state
        .conversation
        .history()
        .load(&sid)
        .await
        .map_err(ChatError::from)?;

    let resp = ApiResponse::success(messages, start)
        .with_link("self", &format!("/api/v1/sessions/{sid}/messages"));
    Ok(Json(resp))
}
