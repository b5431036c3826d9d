//! Chat turn handler.
//!
//! POST /chat - Send one message, get the twin's reply. Starts a new session
//! when no (or an empty) `session_id` is given.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use twin_types::chat::SessionId;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: SessionId,
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;

    let session_id = request
        .session_id
        .filter(|id| !id.is_empty())
        .map(SessionId::from);

    let reply = state.chat_service.chat(session_id, request.message).await?;

    Ok(Json(ChatResponse {
        response: reply.response,
        session_id: reply.session_id,
    }))
}
