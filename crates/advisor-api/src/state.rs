//! Application state wiring all services together.
//!
//! Services are generic over repository and chain traits; AppState pins
//! them to the SQLite store and the LLM-backed chain.

use std::path::Path;
use std::sync::Arc;

use advisor_core::chat::service::ChatService;
use advisor_core::llm::box_provider::BoxLlmProvider;
use advisor_core::qa::chain::LlmQaChain;
use advisor_core::qa::turn::TurnProcessor;
use advisor_infra::config::{resolve_api_key, resolve_database_url};
use advisor_infra::llm::create_provider;
use advisor_infra::sqlite::chat::SqliteChatRepository;
use advisor_infra::sqlite::pool::DatabasePool;
use advisor_types::config::AppConfig;
use secrecy::SecretString;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository>;

pub type ConcreteTurnProcessor = TurnProcessor<SqliteChatRepository, LlmQaChain>;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub turn_processor: Arc<ConcreteTurnProcessor>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connect to the database (running migrations) and wire services.
    pub async fn init(config: AppConfig, data_dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db_url = resolve_database_url(&config, data_dir);
        let db_pool = DatabasePool::new(&db_url).await?;
        tracing::info!(url = %db_url, "Database ready");

        let api_key = resolve_api_key().unwrap_or_else(|| {
            tracing::warn!("No API key set (ADVISOR_API_KEY / OPENAI_API_KEY / DASHSCOPE_API_KEY); questions will fail");
            SecretString::from(String::new())
        });
        let provider = create_provider(&config.llm, api_key);

        Ok(Self::from_parts(config, db_pool, provider))
    }

    /// Wire services from an open pool and an already-built provider.
    pub fn from_parts(config: AppConfig, db_pool: DatabasePool, provider: BoxLlmProvider) -> Self {
        let chat_service = Arc::new(ChatService::new(SqliteChatRepository::new(db_pool)));
        let chain = LlmQaChain::new(provider, &config.llm);
        let turn_processor = Arc::new(
            TurnProcessor::new(chat_service.clone(), chain)
                .with_history_limit(config.chat.history_limit),
        );

        Self {
            chat_service,
            turn_processor,
            config: Arc::new(config),
        }
    }
}
