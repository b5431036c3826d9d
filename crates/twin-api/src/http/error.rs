//! Application error type mapping to HTTP status codes.
//!
//! Every failure leaves the API as `{"detail": "<message>"}`.

use std::any::Any;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use twin_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Classified chat failure.
    Chat(ChatError),
    /// Request body that could not be parsed into the expected shape.
    Rejected(JsonRejection),
    /// Anything unclassified caught at the request boundary.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Rejected(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Chat(ChatError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            AppError::Chat(ChatError::AccessDenied(_)) => StatusCode::FORBIDDEN,
            AppError::Chat(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Rejected(rejection) => rejection.status(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::Chat(e) => e.to_string(),
            AppError::Rejected(rejection) => rejection.body_text(),
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %detail, "Request failed");
        } else {
            warn!(status = status.as_u16(), detail = %detail, "Request rejected");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Turn a handler panic into a 500 instead of dropping the connection.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::Internal(detail).into_response()
}
