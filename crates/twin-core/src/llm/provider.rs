//! LlmProvider trait definition.

use twin_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for hosted inference backends.
///
/// Implementations live in twin-infra (e.g., `BedrockProvider`). They are
/// constructed once at startup and shared by every request, so they must be
/// safe for concurrent use.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name used in error details (e.g., "Bedrock").
    fn name(&self) -> &str;

    /// Model identifier every request is sent to.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
