//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the CLI and REST
//! API. Services are generic over the engine/repository traits; AppState
//! pins them to the concrete infra implementations and selects the memory
//! backend from configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use mnemon_core::memory::BoxMemoryStore;
use mnemon_core::service::{ProfileService, UserMemoryService};
use mnemon_core::task::{TaskRegistry, TaskRunner};
use mnemon_infra::config::{load_service_config, resolve_data_dir};
use mnemon_infra::memory::{EmbeddedMemoryStore, HttpMemoryStore};
use mnemon_infra::sqlite::pool::DatabasePool;
use mnemon_infra::sqlite::profile::SqliteProfileRepository;
use mnemon_types::config::ServiceConfig;

/// Concrete profile service pinned to the SQLite repository.
pub type ConcreteProfileService = ProfileService<SqliteProfileRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub memory: Arc<UserMemoryService<BoxMemoryStore>>,
    pub profiles: Arc<ConcreteProfileService>,
    pub tasks: Arc<TaskRegistry>,
    pub runner: Arc<TaskRunner>,
    pub config: ServiceConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize using the default data directory (`MNEMON_DATA_DIR` or
    /// `~/.mnemon`).
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        Self::init_at(&data_dir).await
    }

    /// Initialize against an explicit data directory: load config, connect
    /// to the database, wire services.
    pub async fn init_at(data_dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let config = load_service_config(data_dir).await;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("mnemon.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let profiles = ProfileService::new(SqliteProfileRepository::new(db_pool.clone()));

        // Embedded store unless the config points at an external engine.
        let store = match &config.memory.endpoint {
            Some(endpoint) => {
                tracing::info!(%endpoint, "using external memory engine");
                BoxMemoryStore::new(HttpMemoryStore::new(
                    endpoint,
                    Duration::from_secs(config.memory.timeout_secs),
                ))
            }
            None => BoxMemoryStore::new(EmbeddedMemoryStore::new()),
        };
        let memory = UserMemoryService::new(store);

        let tasks = Arc::new(TaskRegistry::new());
        let runner = Arc::new(TaskRunner::new(
            Arc::clone(&tasks),
            config.worker.max_concurrency,
        ));

        Ok(Self {
            memory: Arc::new(memory),
            profiles: Arc::new(profiles),
            tasks,
            runner,
            config,
            data_dir: data_dir.to_path_buf(),
            db_pool,
        })
    }
}
