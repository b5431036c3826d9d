//! Conversation history handler.
//!
//! GET /conversation/{session_id} - Full stored log. Unknown sessions return
//! an empty list rather than 404.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use twin_types::chat::{Message, SessionId};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub session_id: SessionId,
    pub messages: Vec<Message>,
}

/// GET /conversation/{session_id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ConversationResponse>, AppError> {
    let session_id = SessionId::from(session_id);
    let messages = state.chat_service.conversation(&session_id).await?;

    Ok(Json(ConversationResponse {
        session_id,
        messages,
    }))
}
