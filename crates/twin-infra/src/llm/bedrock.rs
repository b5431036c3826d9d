//! BedrockProvider -- concrete [`LlmProvider`] implementation for AWS Bedrock.
//!
//! Uses the Converse API through the official SDK with IAM credentials from
//! the default provider chain. Converse is stateless, so every call carries
//! the full turn sequence.

use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockruntime::operation::converse::ConverseError;
use aws_sdk_bedrockruntime::types as bedrock;
use tracing::{debug, info};

use twin_core::llm::provider::LlmProvider;
use twin_types::config::BedrockConfig;
use twin_types::llm::{
    CompletionRequest, CompletionResponse, ContentSegment, InferenceConfig, LlmError, MessageRole,
    ReplyMessage, Turn, Usage,
};

/// AWS Bedrock Converse provider bound to one model.
pub struct BedrockProvider {
    client: BedrockClient,
    model_id: String,
}

impl BedrockProvider {
    /// Create a provider from an already loaded SDK configuration.
    pub fn new(sdk_config: &SdkConfig, model_id: String) -> Self {
        Self {
            client: BedrockClient::new(sdk_config),
            model_id,
        }
    }

    /// Load AWS configuration for the configured region and build the client.
    pub async fn connect(config: &BedrockConfig) -> Self {
        let sdk_config = crate::aws::load_sdk_config(Some(&config.region)).await;
        info!(model = %config.model_id, region = %config.region, "Bedrock provider initialized");
        Self::new(&sdk_config, config.model_id.clone())
    }
}

impl LlmProvider for BedrockProvider {
    fn name(&self) -> &str {
        "Bedrock"
    }

    fn model(&self) -> &str {
        &self.model_id
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let messages = request
            .turns
            .iter()
            .map(convert_turn)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(model = %self.model_id, messages = messages.len(), "Calling Bedrock Converse API");

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .set_messages(Some(messages))
            .inference_config(convert_inference_config(&request.inference))
            .send()
            .await
            .map_err(|e| convert_converse_error(&e))?;

        Ok(CompletionResponse {
            message: convert_output(response.output()),
            stop_reason: Some(response.stop_reason().as_str().to_string()),
            usage: response.usage().map(|u| Usage {
                input_tokens: u.input_tokens().max(0) as u32,
                output_tokens: u.output_tokens().max(0) as u32,
            }),
        })
    }
}

// ─── Domain → Bedrock ────────────────────────────────────────────

fn convert_role(role: MessageRole) -> bedrock::ConversationRole {
    match role {
        MessageRole::User => bedrock::ConversationRole::User,
        MessageRole::Assistant => bedrock::ConversationRole::Assistant,
    }
}

/// Convert one turn to a single-text-block Bedrock message.
pub fn convert_turn(turn: &Turn) -> Result<bedrock::Message, LlmError> {
    bedrock::Message::builder()
        .role(convert_role(turn.role))
        .content(bedrock::ContentBlock::Text(turn.text.clone()))
        .build()
        .map_err(|e| LlmError::Request(format!("failed to build message: {e}")))
}

pub fn convert_inference_config(config: &InferenceConfig) -> bedrock::InferenceConfiguration {
    bedrock::InferenceConfiguration::builder()
        .max_tokens(config.max_tokens)
        .temperature(config.temperature)
        .top_p(config.top_p)
        .build()
}

// ─── Bedrock → Domain ────────────────────────────────────────────

/// Convert a Bedrock content block; non-text blocks only keep their kind.
pub fn convert_content_block(block: &bedrock::ContentBlock) -> ContentSegment {
    let kind = match block {
        bedrock::ContentBlock::Text(text) => {
            return ContentSegment::Text { text: text.clone() };
        }
        bedrock::ContentBlock::Image(_) => "image",
        bedrock::ContentBlock::ToolUse(_) => "tool_use",
        bedrock::ContentBlock::ToolResult(_) => "tool_result",
        _ => "unknown",
    };
    ContentSegment::Other {
        kind: kind.to_string(),
    }
}

/// Convert the Converse output; anything but a message becomes `None`.
pub fn convert_output(output: Option<&bedrock::ConverseOutput>) -> Option<ReplyMessage> {
    match output {
        Some(bedrock::ConverseOutput::Message(message)) => Some(ReplyMessage {
            content: message.content().iter().map(convert_content_block).collect(),
        }),
        _ => None,
    }
}

/// Convert a modeled Converse service error, keeping its error code.
pub fn convert_service_error(err: &ConverseError) -> LlmError {
    let code = match err {
        ConverseError::ValidationException(_) => Some("ValidationException"),
        ConverseError::AccessDeniedException(_) => Some("AccessDeniedException"),
        ConverseError::ThrottlingException(_) => Some("ThrottlingException"),
        other => other.code(),
    };
    LlmError::Service {
        code: code.map(str::to_string),
        message: err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string()),
    }
}

/// Convert a Bedrock SDK error to an LlmError.
pub fn convert_converse_error(err: &SdkError<ConverseError>) -> LlmError {
    match err {
        SdkError::ServiceError(service_err) => convert_service_error(service_err.err()),
        other => LlmError::Transport(DisplayErrorContext(other).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_bedrockruntime::types::error::{
        AccessDeniedException, ThrottlingException, ValidationException,
    };

    #[test]
    fn test_convert_turn_sets_role_and_text() {
        let msg = convert_turn(&Turn::assistant("hello")).unwrap();
        assert_eq!(msg.role(), &bedrock::ConversationRole::Assistant);
        assert_eq!(msg.content().len(), 1);
        assert!(matches!(&msg.content()[0], bedrock::ContentBlock::Text(t) if t == "hello"));
    }

    #[test]
    fn test_convert_inference_config() {
        let cfg = convert_inference_config(&InferenceConfig {
            max_tokens: 2000,
            temperature: 0.7,
            top_p: 0.9,
        });
        assert_eq!(cfg.max_tokens(), Some(2000));
        assert_eq!(cfg.temperature(), Some(0.7));
        assert_eq!(cfg.top_p(), Some(0.9));
    }

    #[test]
    fn test_convert_text_content_block() {
        let block = bedrock::ContentBlock::Text("hi".to_string());
        assert_eq!(
            convert_content_block(&block),
            ContentSegment::Text {
                text: "hi".to_string()
            }
        );
    }

    #[test]
    fn test_convert_output_message() {
        let message = bedrock::Message::builder()
            .role(bedrock::ConversationRole::Assistant)
            .content(bedrock::ContentBlock::Text("answer".to_string()))
            .build()
            .unwrap();
        let output = bedrock::ConverseOutput::Message(message);

        let reply = convert_output(Some(&output)).unwrap();
        assert_eq!(
            reply.content,
            vec![ContentSegment::Text {
                text: "answer".to_string()
            }]
        );
    }

    #[test]
    fn test_convert_output_missing() {
        assert!(convert_output(None).is_none());
    }

    #[test]
    fn test_validation_error_keeps_code() {
        let err = ConverseError::ValidationException(
            ValidationException::builder()
                .message("A conversation must alternate between user and assistant roles")
                .build(),
        );
        let converted = convert_service_error(&err);
        assert_eq!(converted.code(), Some("ValidationException"));
        assert!(converted.to_string().contains("alternate"));
    }

    #[test]
    fn test_access_denied_error_keeps_code() {
        let err = ConverseError::AccessDeniedException(
            AccessDeniedException::builder()
                .message("You don't have access to the model")
                .build(),
        );
        assert_eq!(convert_service_error(&err).code(), Some("AccessDeniedException"));
    }

    #[test]
    fn test_throttling_error_keeps_code() {
        let err = ConverseError::ThrottlingException(
            ThrottlingException::builder().message("Too many requests").build(),
        );
        assert_eq!(convert_service_error(&err).code(), Some("ThrottlingException"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        use aws_sdk_bedrockruntime::config::retry::RetryConfig;
        use aws_sdk_bedrockruntime::config::{BehaviorVersion, Credentials, Region};

        let config = aws_sdk_bedrockruntime::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .endpoint_url("http://127.0.0.1:1")
            .retry_config(RetryConfig::disabled())
            .build();
        let provider = BedrockProvider {
            client: BedrockClient::from_conf(config),
            model_id: "amazon.nova-lite-v1:0".to_string(),
        };

        let request = CompletionRequest {
            turns: vec![Turn::user("hi")],
            inference: InferenceConfig {
                max_tokens: 10,
                temperature: 0.7,
                top_p: 0.9,
            },
        };
        let err = provider.complete(&request).await.unwrap_err();
        match &err {
            LlmError::Transport(msg) => assert!(!msg.starts_with("Bedrock")),
            other => panic!("expected transport error, got {other:?}"),
        }
        assert_eq!(provider.model(), "amazon.nova-lite-v1:0");
    }
}
