//! Conversation messages and session identity.
//!
//! A session's conversation log is an ordered `Vec<Message>`: insertion order
//! is conversation order, and the log is only ever rewritten whole.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Opaque, caller-addressable session identifier.
///
/// Generated when a request omits it, otherwise taken verbatim from the
/// caller. No format is enforced: the value is used as-is to derive the
/// storage key, so identifiers containing path separators or `..` reach the
/// storage backend unchanged. That is a known input-validation gap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh identifier (UUIDv7, hyphenated).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Key/filename the conversation log is stored under: `{id}.json`.
    pub fn storage_key(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single persisted conversation message.
///
/// The timestamp stays a string so that logs written by other tools (or by an
/// earlier version of this service) round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
}

impl Message {
    /// A user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }

    /// An assistant message stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }
}

/// Current UTC time as RFC 3339 with microseconds, e.g. `2026-10-18T09:30:00.123456Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
