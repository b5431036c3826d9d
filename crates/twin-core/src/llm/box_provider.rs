//! BoxLlmProvider -- object-safe dynamic dispatch wrapper for LlmProvider.
//!
//! Same blanket-impl pattern as `BoxSessionStore`.

use std::future::Future;
use std::pin::Pin;

use twin_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::LlmProvider;

/// Object-safe version of [`LlmProvider`] with boxed futures.
pub trait LlmProviderDyn: Send + Sync {
    fn provider_name(&self) -> &str;

    fn provider_model(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;
}

/// Blanket implementation: any `LlmProvider` automatically implements `LlmProviderDyn`.
impl<T: LlmProvider> LlmProviderDyn for T {
    fn provider_name(&self) -> &str {
        LlmProvider::name(self)
    }

    fn provider_model(&self) -> &str {
        LlmProvider::model(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// Type-erased LLM provider.
///
/// Lets the HTTP layer hold one concrete service type whether it is wired to
/// Bedrock in production or to a stub in tests.
pub struct BoxLlmProvider {
    inner: Box<dyn LlmProviderDyn + Send + Sync>,
}

impl BoxLlmProvider {
    /// Wrap a concrete `LlmProvider` in a type-erased box.
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl LlmProvider for BoxLlmProvider {
    fn name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model(&self) -> &str {
        self.inner.provider_model()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.inner.complete_boxed(request).await
    }
}

#[cfg(test)]
mod tests {
    use twin_types::llm::{ContentSegment, InferenceConfig, ReplyMessage, Turn};

    use super::*;

    struct EchoProvider;

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "Echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let last = request.turns.last().map(|t| t.text.clone()).unwrap_or_default();
            Ok(CompletionResponse {
                message: Some(ReplyMessage {
                    content: vec![ContentSegment::Text { text: last }],
                }),
                stop_reason: None,
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn test_box_provider_delegates() {
        let provider = BoxLlmProvider::new(EchoProvider);
        assert_eq!(provider.name(), "Echo");
        assert_eq!(provider.model(), "echo-1");

        let request = CompletionRequest {
            turns: vec![Turn::user("ping")],
            inference: InferenceConfig {
                max_tokens: 10,
                temperature: 0.7,
                top_p: 0.9,
            },
        };
        let response = provider.complete(&request).await.unwrap();
        assert_eq!(
            response.message.unwrap().content,
            vec![ContentSegment::Text {
                text: "ping".to_string()
            }]
        );
    }
}
