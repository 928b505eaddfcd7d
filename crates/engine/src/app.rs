//! Application state and composition.

use std::sync::Arc;

use tokio::task::JoinHandle;

use questline_domain::Catalog;

use crate::infrastructure::config::SyncConfig;
use crate::infrastructure::ports::{AuthPort, RemoteStore};
use crate::stores::{CatalogStore, LocalProgressStore, TeamStore};
use crate::use_cases;

/// Main application state.
///
/// Owns every store and use case; nothing here is a global.
pub struct App {
    pub stores: Stores,
    pub use_cases: UseCases,
    pub config: SyncConfig,
}

/// Container for runtime state.
pub struct Stores {
    pub progress: Arc<LocalProgressStore>,
    pub team: Arc<TeamStore>,
    pub catalog: Arc<CatalogStore>,
}

/// Container for all use cases.
pub struct UseCases {
    pub progress: use_cases::ProgressUseCases,
    pub sync: use_cases::SyncUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        progress: LocalProgressStore,
        catalog: Catalog,
        remote: Arc<dyn RemoteStore>,
        auth: Arc<dyn AuthPort>,
        config: SyncConfig,
    ) -> Self {
        let stores = Stores {
            progress: Arc::new(progress),
            team: Arc::new(TeamStore::new()),
            catalog: Arc::new(CatalogStore::new(catalog)),
        };

        let progress = use_cases::ProgressUseCases::new(
            Arc::new(use_cases::progress::ProgressQueries::new(
                stores.progress.clone(),
                stores.team.clone(),
                stores.catalog.clone(),
                auth.clone(),
            )),
            Arc::new(use_cases::progress::ProgressActions::new(
                stores.progress.clone(),
                remote.clone(),
                auth.clone(),
                config.clone(),
            )),
        );

        let sync = use_cases::SyncUseCases::new(
            Arc::new(use_cases::sync::SyncGateway::new(
                stores.progress.clone(),
                remote.clone(),
                auth,
                config.clone(),
            )),
            Arc::new(use_cases::sync::TeammateSync::new(
                remote,
                stores.team.clone(),
                config.clone(),
            )),
        );

        Self {
            stores,
            use_cases: UseCases { progress, sync },
            config,
        }
    }

    /// Start the debounced push loop and hydrate on every sign-in.
    pub fn start_sync(&self) -> Vec<JoinHandle<()>> {
        let gateway = &self.use_cases.sync.gateway;
        let mut handles = Vec::with_capacity(2);
        if let Some(push_loop) = gateway.start_push_loop() {
            handles.push(push_loop);
        }
        handles.push(gateway.follow_auth());
        handles
    }
}
