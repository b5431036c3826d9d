//! Application state wiring the chat service together.
//!
//! The chat service is generic over its store and provider; AppState pins it
//! to the boxed ports so the backend can be chosen at runtime.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use twin_core::chat::service::ChatService;
use twin_core::llm::box_provider::BoxLlmProvider;
use twin_core::session::box_store::BoxSessionStore;
use twin_infra::llm::bedrock::BedrockProvider;
use twin_infra::prompt::load_system_prompt;
use twin_infra::storage::connect_session_store;
use twin_types::config::StorageBackend;

use crate::config::Cli;

pub type ConcreteChatService = ChatService<BoxSessionStore, BoxLlmProvider>;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub storage: StorageBackend,
}

impl AppState {
    pub fn new(chat_service: ConcreteChatService, storage: StorageBackend) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
            storage,
        }
    }

    /// Build the store, the provider and the system prompt from configuration.
    pub async fn init(cli: &Cli) -> anyhow::Result<Self> {
        let storage = cli.storage_backend()?;
        let system_prompt = load_system_prompt(cli.prompt_file.as_deref())
            .await
            .context("failed to load system prompt")?;

        let store = connect_session_store(&storage).await;
        let provider = BedrockProvider::connect(&cli.bedrock_config()).await;

        let chat_service = ChatService::new(store, BoxLlmProvider::new(provider), system_prompt);
        info!(
            backend = chat_service.storage_name(),
            storage = %storage,
            model = %cli.bedrock_model_id,
            "Application state initialized"
        );

        Ok(Self::new(chat_service, storage))
    }
}
