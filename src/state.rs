use std::sync::Arc;
use tracing::info;

use crate::config::{Config, SessionBackend};
use crate::gateway::{GatewayFactory, ModelGateway};
use crate::history::{FileHistoryStore, HistoryStore, MemoryHistoryStore};
use crate::tasks::TaskRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<TaskRegistry>,
    /// `None` when no credential was available at startup
    pub gateway: Option<Arc<dyn ModelGateway>>,
    pub history: Arc<dyn HistoryStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let registry = Arc::new(TaskRegistry::with_overrides(&config.tasks));
        info!("Registered tasks: {:?}", registry.task_ids());

        let gateway = GatewayFactory::create_gateway(&config.model)?;

        let history: Arc<dyn HistoryStore> = match config.session.backend {
            SessionBackend::Memory => {
                info!("Using in-memory session history");
                Arc::new(MemoryHistoryStore::new())
            }
            SessionBackend::Filesystem => {
                info!("Using filesystem session history in {}", config.session.dir);
                Arc::new(FileHistoryStore::new(&config.session.dir)?)
            }
        };

        Ok(Self::with_components(config, registry, gateway, history))
    }

    pub fn with_components(
        config: Config,
        registry: Arc<TaskRegistry>,
        gateway: Option<Arc<dyn ModelGateway>>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            config,
            registry,
            gateway,
            history,
        }
    }

    pub fn history_cap(&self) -> usize {
        self.config.session.history_cap
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}
