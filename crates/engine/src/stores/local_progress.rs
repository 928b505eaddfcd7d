//! The local user's progress record.
//!
//! Wraps a [`StoredProgress`] so every read goes through the migration guard,
//! and publishes a [`ProgressChange`] for every mutation so the sync gateway
//! can debounce pushes off the change stream.

use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use questline_domain::{DomainError, ProgressChange, Settlement, StoredProgress, UserProgress};

const CHANGE_CHANNEL_CAPACITY: usize = 256;

pub struct LocalProgressStore {
    state: RwLock<StoredProgress>,
    changes: broadcast::Sender<ProgressChange>,
}

impl LocalProgressStore {
    pub fn new(progress: UserProgress) -> Self {
        Self::from_stored(StoredProgress::current(progress))
    }

    /// Load a persisted document of any schema version. Legacy documents are
    /// migrated lazily on first access.
    pub fn from_document(document: Value) -> Result<Self, DomainError> {
        Ok(Self::from_stored(StoredProgress::from_document(document)?))
    }

    fn from_stored(stored: StoredProgress) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(stored),
            changes,
        }
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<ProgressChange> {
        self.changes.subscribe()
    }

    pub async fn is_legacy(&self) -> bool {
        self.state.read().await.is_legacy()
    }

    /// Run `f` against the migrated record.
    pub async fn read<R>(&self, f: impl FnOnce(&UserProgress) -> R) -> R {
        {
            let guard = self.state.read().await;
            if let Some(progress) = guard.migrated() {
                return f(progress);
            }
        }

        let mut guard = self.state.write().await;
        let (progress, settlement) = guard.settle();
        self.report(&settlement);
        f(progress)
    }

    pub async fn snapshot(&self) -> UserProgress {
        self.read(UserProgress::clone).await
    }

    /// Apply a local edit and publish its change.
    pub async fn mutate(&self, f: impl FnOnce(&mut UserProgress) -> ProgressChange) -> ProgressChange {
        let mut guard = self.state.write().await;
        let (progress, settlement) = guard.settle();
        self.report(&settlement);
        let change = f(progress);
        self.publish(change.clone());
        change
    }

    /// Merge remote state in per field. A patch naming an unknown game mode
    /// leaves the record unchanged.
    pub async fn apply_patch(&self, patch: Value) -> Result<ProgressChange, DomainError> {
        let mut guard = self.state.write().await;
        let (progress, settlement) = guard.settle();
        self.report(&settlement);
        let change = progress.apply_patch(patch)?;
        self.publish(change.clone());
        Ok(change)
    }

    fn report(&self, settlement: &Settlement) {
        match settlement {
            Settlement::AlreadyCurrent => {}
            Settlement::Migrated => {
                tracing::info!("Migrated legacy progress document to dual-mode shape");
            }
            Settlement::Reset(e) => {
                tracing::error!(error = %e, "Legacy progress document could not be migrated, starting fresh");
            }
        }
        if let Some(change) = settlement.change() {
            self.publish(change);
        }
    }

    fn publish(&self, change: ProgressChange) {
        // No receivers just means nobody is syncing yet.
        let _ = self.changes.send(change);
    }
}

impl Default for LocalProgressStore {
    fn default() -> Self {
        Self::new(UserProgress::default())
    }
}
