//! Conversation assembly and the per-request chat workflow.

pub mod assembler;
pub mod service;
