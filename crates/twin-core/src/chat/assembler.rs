//! Conversation assembly: from stored history to the exact turn sequence
//! sent to the model, and from the model's answer (or failure) back to a
//! reply string or a classified [`ChatError`].
//!
//! Turn layout for every call:
//!
//! ```text
//! [0]        user: "System: {system prompt}"
//! [1..=N]    the last N stored messages, N <= HISTORY_WINDOW, original order
//! [N+1]      user: {new message}
//! ```

use tracing::{Instrument, debug, info_span, warn};

use twin_types::chat::Message;
use twin_types::error::ChatError;
use twin_types::llm::{
    CompletionRequest, CompletionResponse, ContentSegment, InferenceConfig, LlmError, Turn,
};

use crate::llm::provider::LlmProvider;

/// Number of most recent stored messages included in each model call.
pub const HISTORY_WINDOW: usize = 20;

/// Prefix marking the leading turn as the system prompt.
pub const SYSTEM_MARKER: &str = "System: ";

/// Fixed generation parameters for every call.
pub const INFERENCE_CONFIG: InferenceConfig = InferenceConfig {
    max_tokens: 2000,
    temperature: 0.7,
    top_p: 0.9,
};

/// The suffix of `history` that fits in the window.
pub fn windowed(history: &[Message]) -> &[Message] {
    &history[history.len().saturating_sub(HISTORY_WINDOW)..]
}

/// Build the completion request for one chat turn.
pub fn build_request(
    system_prompt: &str,
    history: &[Message],
    user_message: &str,
) -> CompletionRequest {
    let window = windowed(history);
    let mut turns = Vec::with_capacity(window.len() + 2);

    turns.push(Turn::user(format!("{SYSTEM_MARKER}{system_prompt}")));
    turns.extend(window.iter().map(|m| Turn {
        role: m.role,
        text: m.content.clone(),
    }));
    turns.push(Turn::user(user_message));

    CompletionRequest {
        turns,
        inference: INFERENCE_CONFIG,
    }
}

/// Pull the reply text out of a completion.
///
/// The output must be a message whose first content segment is text.
pub fn extract_reply(response: CompletionResponse) -> Result<String, ChatError> {
    let message = response.message.ok_or_else(|| {
        ChatError::UnexpectedResponseShape("response contained no output message".to_string())
    })?;

    match message.content.into_iter().next() {
        Some(ContentSegment::Text { text }) => Ok(text),
        Some(ContentSegment::Other { kind }) => Err(ChatError::UnexpectedResponseShape(format!(
            "first content segment is '{kind}', expected text"
        ))),
        None => Err(ChatError::UnexpectedResponseShape(
            "output message has no content".to_string(),
        )),
    }
}

/// Map a provider failure onto the chat error taxonomy.
///
/// This is the only place provider error codes are interpreted.
pub fn classify_llm_error(provider: &str, err: &LlmError) -> ChatError {
    match err.code() {
        Some("ValidationException") => {
            ChatError::InvalidRequest(format!("Invalid message format for {provider}"))
        }
        Some("AccessDeniedException") => {
            ChatError::AccessDenied(format!("Access denied to {provider} model"))
        }
        _ => ChatError::BackendFailure(format!("{provider} error: {err}")),
    }
}

/// Assemble the turns, call the provider once, and return the reply text.
///
/// No retries: any provider failure fails the turn.
pub async fn build_and_call<P: LlmProvider>(
    provider: &P,
    system_prompt: &str,
    history: &[Message],
    user_message: &str,
) -> Result<String, ChatError> {
    let request = build_request(system_prompt, history, user_message);

    let span = info_span!(
        "gen_ai.chat",
        gen_ai.system = provider.name(),
        gen_ai.request.model = provider.model(),
        gen_ai.request.max_tokens = request.inference.max_tokens,
        gen_ai.request.temperature = request.inference.temperature,
        gen_ai.request.top_p = request.inference.top_p,
    );

    debug!(
        stored = history.len(),
        turns = request.turns.len(),
        "Calling inference backend"
    );

    let response = provider
        .complete(&request)
        .instrument(span)
        .await
        .map_err(|e| {
            let classified = classify_llm_error(provider.name(), &e);
            warn!(error = %e, classified = ?classified, "Inference call failed");
            classified
        })?;

    if let Some(usage) = &response.usage {
        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            stop_reason = response.stop_reason.as_deref().unwrap_or("unknown"),
            "Inference call complete"
        );
    }

    extract_reply(response).inspect_err(|e| warn!(error = %e, "Unusable inference response"))
}
