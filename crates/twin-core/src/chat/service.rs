//! Chat service orchestrating one conversational turn.
//!
//! ChatService coordinates the SessionStore and the LlmProvider:
//! load history -> assemble and call the model -> append the exchange -> save.

use tracing::{error, info};

use twin_types::chat::{Message, SessionId};
use twin_types::error::ChatError;

use crate::chat::assembler;
use crate::llm::provider::LlmProvider;
use crate::session::store::SessionStore;

/// Result of a successful chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub session_id: SessionId,
}

/// Orchestrates chat turns against one store and one provider.
///
/// Generic over `SessionStore` and `LlmProvider` to maintain clean
/// architecture (twin-core never depends on twin-infra). Both collaborators
/// are created once at startup and shared by all requests.
pub struct ChatService<S: SessionStore, P: LlmProvider> {
    store: S,
    provider: P,
    system_prompt: String,
}

impl<S: SessionStore, P: LlmProvider> ChatService<S, P> {
    /// Create a new chat service.
    pub fn new(store: S, provider: P, system_prompt: String) -> Self {
        Self {
            store,
            provider,
            system_prompt,
        }
    }

    /// Access the session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the LLM provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Short name of the active storage backend.
    pub fn storage_name(&self) -> &str {
        self.store.name()
    }

    /// Run one chat turn.
    ///
    /// Generates a session id when none is given. On success the stored log
    /// grows by exactly two messages (user, then assistant). On any failure
    /// nothing is written.
    ///
    /// There is no per-session locking: two concurrent turns on the same
    /// session both load the same log and the later save wins, dropping the
    /// other exchange.
    pub async fn chat(
        &self,
        session_id: Option<SessionId>,
        message: String,
    ) -> Result<ChatReply, ChatError> {
        let session_id = session_id.unwrap_or_else(SessionId::generate);

        let mut conversation = self.store.load(&session_id).await.map_err(|e| {
            error!(
                session_id = %session_id,
                backend = self.store.name(),
                error = %e,
                "Failed to load conversation"
            );
            ChatError::from(e)
        })?;

        let reply = assembler::build_and_call(
            &self.provider,
            &self.system_prompt,
            &conversation,
            &message,
        )
        .await
        .inspect_err(|e| error!(session_id = %session_id, error = %e, "Chat turn failed"))?;

        conversation.push(Message::user(message));
        conversation.push(Message::assistant(reply.clone()));

        self.store
            .save(&session_id, &conversation)
            .await
            .map_err(|e| {
                error!(
                    session_id = %session_id,
                    backend = self.store.name(),
                    error = %e,
                    "Failed to save conversation"
                );
                ChatError::from(e)
            })?;

        info!(
            session_id = %session_id,
            messages = conversation.len(),
            reply_chars = reply.len(),
            "Chat turn complete"
        );

        Ok(ChatReply {
            response: reply,
            session_id,
        })
    }

    /// The full stored log for a session (empty when unknown).
    pub async fn conversation(&self, session_id: &SessionId) -> Result<Vec<Message>, ChatError> {
        self.store.load(session_id).await.map_err(|e| {
            error!(
                session_id = %session_id,
                backend = self.store.name(),
                error = %e,
                "Failed to load conversation"
            );
            ChatError::from(e)
        })
    }
}
