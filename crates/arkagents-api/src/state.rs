//! Application state wiring all services together.
//!
//! AppState holds the service instances used by both CLI and REST API.
//! Services are generic over the repository traits; the type aliases below
//! pin them to the SQLite or in-memory backends.

use std::path::Path;
use std::sync::Arc;

use arkagents_core::chat::context::ContextAssembler;
use arkagents_core::chat::service::{ChatService, ChatSettings};
use arkagents_core::llm::box_provider::BoxLlmProvider;
use arkagents_core::repository::agent::AgentRepository;
use arkagents_core::repository::in_memory::InMemoryStore;
use arkagents_core::repository::message::MessageRepository;
use arkagents_core::service::agent::AgentService;
use arkagents_core::service::conversation::ConversationService;
use arkagents_infra::config::{database_url, resolve_api_key};
use arkagents_infra::llm::create_provider;
use arkagents_infra::sqlite::agent::SqliteAgentRepository;
use arkagents_infra::sqlite::message::SqliteMessageRepository;
use arkagents_infra::sqlite::pool::DatabasePool;
use arkagents_types::config::AppConfig;

/// State backed by the SQLite database in the data directory.
pub type SqliteState = AppState<SqliteAgentRepository, SqliteMessageRepository>;

/// State backed by process memory; everything is lost on exit.
pub type InMemoryState = AppState<InMemoryStore, InMemoryStore>;

/// Shared application state holding all services.
pub struct AppState<A: AgentRepository, M: MessageRepository> {
    pub agent_service: Arc<AgentService<A>>,
    pub chat_service: Arc<ChatService<A, M>>,
    pub conversation_service: Arc<ConversationService<A, M>>,
    /// Whether a provider API key was found at startup.
    pub provider_key_set: bool,
}

impl<A: AgentRepository, M: MessageRepository> Clone for AppState<A, M> {
    fn clone(&self) -> Self {
        Self {
            agent_service: Arc::clone(&self.agent_service),
            chat_service: Arc::clone(&self.chat_service),
            conversation_service: Arc::clone(&self.conversation_service),
            provider_key_set: self.provider_key_set,
        }
    }
}

impl<A, M> AppState<A, M>
where
    A: AgentRepository + Clone,
    M: MessageRepository + Clone,
{
    /// Wire the services over the given repositories and provider.
    pub fn new(
        agent_repo: A,
        message_repo: M,
        provider: BoxLlmProvider,
        config: &AppConfig,
        provider_key_set: bool,
    ) -> Self {
        let agent_service =
            AgentService::with_owner(agent_repo.clone(), config.chat.default_user_id.clone());
        let chat_service = ChatService::new(
            agent_repo.clone(),
            message_repo.clone(),
            provider,
            ContextAssembler::new(config.chat.context_window),
            ChatSettings::from_config(&config.provider),
        );
        let conversation_service = ConversationService::new(agent_repo, message_repo);

        Self {
            agent_service: Arc::new(agent_service),
            chat_service: Arc::new(chat_service),
            conversation_service: Arc::new(conversation_service),
            provider_key_set,
        }
    }
}

impl SqliteState {
    /// Initialize the application state: connect to DB, build the provider, wire services.
    pub async fn init(config: &AppConfig, data_dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(config, data_dir)).await?;

        let api_key = resolve_api_key(&config.provider);
        let provider_key_set = api_key.is_some();
        let provider = create_provider(&config.provider, api_key);

        Ok(Self::new(
            SqliteAgentRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool),
            provider,
            config,
            provider_key_set,
        ))
    }
}

impl InMemoryState {
    /// Initialize with the volatile store. No database is touched.
    pub fn init_in_memory(config: &AppConfig) -> Self {
        let api_key = resolve_api_key(&config.provider);
        let provider_key_set = api_key.is_some();
        let provider = create_provider(&config.provider, api_key);
        let store = InMemoryStore::new();

        Self::new(store.clone(), store, provider, config, provider_key_set)
    }
}
