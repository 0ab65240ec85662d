//! Turn handler.
//!
//! POST /api/v1/sessions/{id}/turns runs one human/assistant exchange. The
//! client holds the session id (from create/resume) and sends it back with
//! the display name on every turn. An id that is not the one registered
//! under that name is answered with 404 and nothing is stored.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use tutorbot_core::chat::service::TurnOutcome;

use crate::http::error::AppError;
use crate::http::handlers::parse_session_id;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub user_name: String,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct TurnView {
    pub response: String,
    /// False when the prompt was empty and nothing was stored.
    pub recorded: bool,
}

/// POST /api/v1/sessions/{id}/turns - Send a prompt, get the tutor's reply.
pub async fn post_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TurnView>>, AppError> {
    let start = Instant::now();
    let sid = parse_session_id(&session_id)?;
    let Json(body) = payload?;

    let context = state
        .sessions
        .attach(sid, &body.user_name)
        .await?
        .ok_or(AppError::SessionNotFound)?;
    let outcome = state.conversation.handle_turn(&context, &body.prompt).await?;

    let view = TurnView {
        response: outcome.response_text().to_string(),
        recorded: matches!(outcome, TurnOutcome::Reply { .. }),
    };

    let resp = ApiResponse::success(view, start)
        .with_link("messages", &format!("/api/v1/sessions/{sid}/messages"));
    Ok(Json(resp))
}
