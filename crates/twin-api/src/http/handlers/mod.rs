//! HTTP request handlers.

pub mod chat;
pub mod conversation;
pub mod root;
