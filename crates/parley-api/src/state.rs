//! Application state wiring the orchestrator to its infrastructure.
//!
//! The orchestrator is generic over its ports; AppState pins it to the
//! concrete infra implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parley_core::memory::ConversationMemory;
use parley_core::orchestrator::{Orchestrator, StateLayer};
use parley_infra::catalog::load_catalog;
use parley_infra::config::{load_config, resolve_data_dir};
use parley_infra::crypto::AesGcmCipher;
use parley_infra::llm::OpenAiCompatClient;
use parley_infra::sqlite::pool::database_url;
use parley_infra::sqlite::{DatabasePool, SqliteRecordStore, SqliteRoomRegistry};
use parley_types::catalog::AgentCatalog;
use parley_types::config::ParleyConfig;

pub type ConcreteMemory = ConversationMemory<SqliteRecordStore, AesGcmCipher, OpenAiCompatClient>;

pub type ConcreteOrchestrator = Orchestrator<
    OpenAiCompatClient,
    SqliteRoomRegistry,
    SqliteRecordStore,
    AesGcmCipher,
    OpenAiCompatClient,
>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: Arc<ParleyConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Resolve the data directory, load its config, and wire everything.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;
        let config = load_config(&data_dir).await;
        Self::build(data_dir, config, Path::new(".")).await
    }

    /// Wire the state from an explicit config. Relative catalog paths
    /// resolve against `catalog_dir`.
    pub async fn build(
        data_dir: PathBuf,
        config: ParleyConfig,
        catalog_dir: &Path,
    ) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        // Room and memory management work without a catalog.
        let catalog = match load_catalog(&config.catalog, catalog_dir).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("{e}; no agents available");
                AgentCatalog::default()
            }
        };

        let llm = OpenAiCompatClient::from_config(&config.llm);
        let memory = ConversationMemory::new(
            SqliteRecordStore::new(db_pool.clone()),
            AesGcmCipher,
            llm.clone(),
            config.memory.clone(),
        );
        let orchestrator = Orchestrator::new(
            catalog,
            StateLayer::from_config(&config),
            llm,
            SqliteRoomRegistry::new(db_pool.clone()),
            memory,
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }

    pub fn registry(&self) -> &SqliteRoomRegistry {
        self.orchestrator.registry()
    }

    pub fn memory(&self) -> &ConcreteMemory {
        self.orchestrator.memory()
    }
}
