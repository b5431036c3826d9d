//! Shared domain types for the digital twin chat backend.
//!
//! This crate contains the types every other crate speaks in: conversation
//! messages and session identifiers, LLM request/response shapes, storage
//! backend selection, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
