//! Business logic and port trait definitions for the digital twin backend.
//!
//! This crate defines the "ports" (session store and LLM provider traits) that
//! the infrastructure layer implements, plus the conversation assembly rules
//! and the chat service that ties them together. It depends only on
//! `twin-types` -- never on `twin-infra` or any storage/SDK crate.

pub mod chat;
pub mod llm;
pub mod session;
