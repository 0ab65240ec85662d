//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the terminal
//! chat and the REST API. The core services are generic over their ports;
//! the aliases below pin them to the infra implementations.

use std::path::Path;
use std::sync::Arc;

use tutorbot_core::chat::generator::{GeneratorSettings, LlmResponseGenerator};
use tutorbot_core::chat::service::ConversationService;
use tutorbot_core::chat::session::SessionController;
use tutorbot_core::history::repository::HistoryRepository;
use tutorbot_infra::config::RuntimeConfig;
use tutorbot_infra::filesystem::identity::JsonIdentityStore;
use tutorbot_infra::llm::create_provider;
use tutorbot_infra::sqlite::history::SqliteHistoryRepository;
use tutorbot_infra::sqlite::pool::DatabasePool;
use tutorbot_types::config::TutorConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteSessionController = SessionController<JsonIdentityStore, SqliteHistoryRepository>;

pub type ConcreteConversationService =
    ConversationService<SqliteHistoryRepository, LlmResponseGenerator>;

/// The persistent stores, without anything that needs an API key.
///
/// Enough for the history viewer and the admin tool.
#[derive(Clone)]
pub struct Storage {
    pub db_pool: DatabasePool,
    pub history: SqliteHistoryRepository,
    pub identity: JsonIdentityStore,
}

impl Storage {
    /// Connect to the history database, create the schema if missing, and
    /// open the identity file.
    pub async fn open(config: &RuntimeConfig) -> anyhow::Result<Self> {
        let (db_pool, history) = open_history(&config.data_dir, &config.database_url).await?;

        Ok(Self {
            db_pool,
            history,
            identity: JsonIdentityStore::new(&config.identity_path),
        })
    }

    pub fn session_controller(&self) -> ConcreteSessionController {
        SessionController::new(self.identity.clone(), self.history.clone())
    }
}

/// Connect to the history database under `data_dir` and create the schema
/// if missing.
pub async fn open_history(
    data_dir: &Path,
    database_url: &str,
) -> anyhow::Result<(DatabasePool, SqliteHistoryRepository)> {
    tokio::fs::create_dir_all(data_dir).await?;

    let db_pool = DatabasePool::new(database_url).await?;
    let history = SqliteHistoryRepository::new(db_pool.clone());
    history.ensure_schema().await?;
    Ok((db_pool, history))
}

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<ConcreteSessionController>,
    pub conversation: Arc<ConcreteConversationService>,
    pub tutor: Arc<TutorConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the DB, build the LLM
    /// provider, wire services. Fails when the API key is missing.
    pub async fn init(config: &RuntimeConfig) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?;
        let provider = create_provider(&config.tutor, api_key)?;
        let storage = Storage::open(config).await?;

        let generator = LlmResponseGenerator::new(provider, generator_settings(&config.tutor));
        Ok(Self::from_parts(storage, generator, config.tutor.clone()))
    }

    /// Wire services from already-opened parts.
    pub fn from_parts(storage: Storage, generator: LlmResponseGenerator, tutor: TutorConfig) -> Self {
        let conversation = ConversationService::new(storage.history.clone(), generator);

        Self {
            sessions: Arc::new(storage.session_controller()),
            conversation: Arc::new(conversation),
            tutor: Arc::new(tutor),
            db_pool: storage.db_pool,
        }
    }
}

fn generator_settings(tutor: &TutorConfig) -> GeneratorSettings {
    GeneratorSettings {
        subject: tutor.subject.clone(),
        model: tutor.model.clone(),
        max_tokens: tutor.max_tokens,
        temperature: tutor.temperature,
    }
}
