//! LLM request/response types.
//!
//! These types model the provider-neutral shape of a single inference call:
//! an ordered list of role-tagged turns plus a generation configuration in,
//! an optional output message made of content segments out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in a conversation.
///
/// The inference protocol has no system role, so only user and assistant
/// exist; the system prompt travels as a user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// One role-tagged content unit sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: MessageRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }
}

/// Sampling parameters for a call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub max_tokens: i32,
    pub temperature: f32,
    pub top_p: f32,
}

/// Request to an LLM provider for a completion.
///
/// The model id is owned by the provider, not the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub turns: Vec<Turn>,
    pub inference: InferenceConfig,
}

/// A piece of content in the model's output message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSegment {
    Text { text: String },
    /// Any non-text block (image, tool use, ...); only its kind is kept.
    Other { kind: String },
}

/// The output message of a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMessage {
    pub content: Vec<ContentSegment>,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Response from an LLM provider.
///
/// `message` is `None` when the provider returned an output that is not a
/// message at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub message: Option<ReplyMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Errors from LLM provider operations.
///
/// Adapters only report what happened; classification into the chat error
/// taxonomy happens in `twin-core`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// The service answered with a modeled error (e.g. `ValidationException`).
    #[error("{}", service_error_text(.code.as_deref(), .message))]
    Service {
        code: Option<String>,
        message: String,
    },

    /// The request never got a service answer (dispatch, timeout, bad response).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request could not be built locally.
    #[error("request construction failed: {0}")]
    Request(String),
}

impl LlmError {
    /// The provider's error code, when the service supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            LlmError::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

fn service_error_text(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    }
}
