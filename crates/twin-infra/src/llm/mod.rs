//! LLM provider implementations.

pub mod bedrock;
