//! Current quest and station definitions.

use std::sync::Arc;

use tokio::sync::RwLock;

use questline_domain::Catalog;

/// Holds the latest definition payload. Readers get a cheap shared handle.
#[derive(Default)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub async fn get(&self) -> Arc<Catalog> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, catalog: Catalog) {
        tracing::debug!(
            quests = catalog.quests.len(),
            stations = catalog.stations.len(),
            "Definitions replaced"
        );
        *self.current.write().await = Arc::new(catalog);
    }
}
