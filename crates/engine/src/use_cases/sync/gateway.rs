//! Sync gateway - debounced push of the local record, hydration and
//! realtime patches from the remote row.
//!
//! Write suppression follows `InitialLoad -> SyncEnabled`. The phase only
//! moves forward: once enabled, sync stays enabled for the life of the
//! gateway.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use questline_domain::ProgressChange;

use crate::infrastructure::config::SyncConfig;
use crate::infrastructure::ports::{AuthPort, RemoteStore, RowFilter, SyncError, USER_ID_COLUMN};
use crate::stores::LocalProgressStore;

use super::row::{ProgressRow, ProgressRowTransform, PushContext, PushDecision, PushTransform, SkipReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Local state may still be defaults; pushes are suppressed
    InitialLoad,
    SyncEnabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// Remote row applied; sync enables after the grace period
    Hydrated,
    /// No remote row yet; sync enabled immediately
    NoRemoteRow,
}

pub struct SyncGateway {
    progress: Arc<LocalProgressStore>,
    remote: Arc<dyn RemoteStore>,
    auth: Arc<dyn AuthPort>,
    transform: Arc<dyn PushTransform>,
    config: SyncConfig,
    sync_enabled: Arc<AtomicBool>,
    push_loop_started: AtomicBool,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SyncGateway {
    pub fn new(
        progress: Arc<LocalProgressStore>,
        remote: Arc<dyn RemoteStore>,
        auth: Arc<dyn AuthPort>,
        config: SyncConfig,
    ) -> Self {
        Self {
            progress,
            remote,
            auth,
            transform: Arc::new(ProgressRowTransform),
            config,
            sync_enabled: Arc::new(AtomicBool::new(false)),
            push_loop_started: AtomicBool::new(false),
            listener: Mutex::new(None),
        }
    }

    pub fn with_transform(mut self, transform: Arc<dyn PushTransform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn phase(&self) -> SyncPhase {
        if self.sync_enabled.load(Ordering::SeqCst) {
            SyncPhase::SyncEnabled
        } else {
            SyncPhase::InitialLoad
        }
    }

    pub fn enable_sync(&self) {
        if !self.sync_enabled.swap(true, Ordering::SeqCst) {
            tracing::info!("Initial load complete, sync enabled");
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    // =========================================================================
    // Write path
    // =========================================================================

    /// Push the current record now, reading it at call time.
    pub async fn push_now(&self) -> Result<PushOutcome, SyncError> {
        let session = self.auth.session();
        let Some(user_id) = session.authenticated_user() else {
            tracing::debug!("Skipping push - user not logged in");
            return Ok(PushOutcome::Skipped(SkipReason::Unauthenticated));
        };

        let context = PushContext {
            user_id: user_id.to_string(),
            phase: self.phase(),
        };
        let decision = self
            .progress
            .read(|progress| self.transform.transform(progress, &context))
            .await?;

        let mut row = match decision {
            PushDecision::Skip(reason) => {
                tracing::debug!(reason = ?reason, "Skipping push - transform declined");
                return Ok(PushOutcome::Skipped(reason));
            }
            PushDecision::Push(row) => row,
        };

        if let Value::Object(columns) = &mut row {
            let has_user = columns
                .get(USER_ID_COLUMN)
                .and_then(Value::as_str)
                .is_some_and(|id| !id.is_empty());
            if !has_user {
                columns.insert(USER_ID_COLUMN.to_string(), Value::from(user_id));
            }
        }

        match self.remote.upsert(&self.config.table, row).await {
            Ok(()) => {
                tracing::info!(table = %self.config.table, user_id = %user_id, "Synced progress");
                Ok(PushOutcome::Pushed)
            }
            Err(e) => {
                tracing::error!(table = %self.config.table, error = %e, "Failed to sync progress");
                Err(e.into())
            }
        }
    }

    /// Start the debounced push loop. Only the first call spawns a task.
    pub fn start_push_loop(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.push_loop_started.swap(true, Ordering::SeqCst) {
            return None;
        }
        let changes = self.progress.subscribe_changes();
        let gateway = Arc::clone(self);
        Some(tokio::spawn(async move { gateway.run_push_loop(changes).await }))
    }

    async fn run_push_loop(self: Arc<Self>, mut changes: broadcast::Receiver<ProgressChange>) {
        loop {
            match changes.recv().await {
                Ok(change) if !change.is_local_edit() => continue,
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return,
            }

            let quiet = tokio::time::sleep(self.config.debounce);
            tokio::pin!(quiet);
            let mut closed = false;
            loop {
                tokio::select! {
                    _ = &mut quiet => break,
                    received = changes.recv() => match received {
                        Ok(change) if !change.is_local_edit() => {}
                        Ok(_) | Err(RecvError::Lagged(_)) => {
                            quiet.as_mut().reset(tokio::time::Instant::now() + self.config.debounce);
                        }
                        Err(RecvError::Closed) => {
                            closed = true;
                            break;
                        }
                    },
                }
            }

            tracing::debug!(table = %self.config.table, "Debounce elapsed, flushing progress");
            match self.push_now().await {
                Ok(PushOutcome::Pushed) => {}
                Ok(PushOutcome::Skipped(reason)) => {
                    tracing::debug!(reason = ?reason, "Debounced push skipped");
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Debounced push failed, retrying on next change");
                }
            }

            if closed {
                return;
            }
        }
    }

    // =========================================================================
    // Read path
    // =========================================================================

    /// Pull the user's row into local state.
    ///
    /// On success sync enables after the hydration grace period; on a missing
    /// row or any failure it enables immediately.
    pub async fn hydrate(&self) -> Result<HydrationOutcome, SyncError> {
        let session = self.auth.session();
        let Some(user_id) = session.authenticated_user() else {
            tracing::warn!("Cannot hydrate progress - user not logged in");
            return Err(SyncError::Unauthenticated);
        };

        let fetched = self
            .remote
            .select_one(&self.config.table, &RowFilter::user(user_id))
            .await;

        let value = match fetched {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::info!(user_id = %user_id, "No remote progress row yet");
                self.enable_sync();
                return Ok(HydrationOutcome::NoRemoteRow);
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Error loading remote progress");
                self.enable_sync();
                return Err(e.into());
            }
        };

        let applied = match ProgressRow::from_value(value) {
            Ok(row) => self
                .progress
                .apply_patch(row.with_defaults().into_patch())
                .await
                .map_err(SyncError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = applied {
            tracing::error!(user_id = %user_id, error = %e, "Remote progress row could not be applied");
            self.enable_sync();
            return Err(e);
        }

        tracing::info!(user_id = %user_id, "Loaded progress from remote store");
        let sync_enabled = Arc::clone(&self.sync_enabled);
        let grace = self.config.hydration_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if !sync_enabled.swap(true, Ordering::SeqCst) {
                tracing::info!("Initial load complete, sync enabled");
            }
        });

        Ok(HydrationOutcome::Hydrated)
    }

    /// Subscribe to the user's row and patch every incoming version into
    /// local state. Replaces any previous listener.
    pub async fn listen(&self) -> Result<(), SyncError> {
        let session = self.auth.session();
        let Some(user_id) = session.authenticated_user() else {
            tracing::warn!("Cannot listen for progress - user not logged in");
            return Err(SyncError::Unauthenticated);
        };

        let mut subscription = self
            .remote
            .subscribe(&self.config.table, RowFilter::user(user_id))
            .await?;
        let progress = Arc::clone(&self.progress);
        let user_id = user_id.to_string();

        let handle = tokio::spawn(async move {
            while let Some(value) = subscription.next().await {
                let patched = match ProgressRow::from_value(value) {
                    Ok(row) => progress.apply_patch(row.into_patch()).await.map_err(SyncError::from),
                    Err(e) => Err(e),
                };
                match patched {
                    Ok(_) => tracing::debug!(user_id = %user_id, "Applied remote progress update"),
                    Err(e) => tracing::warn!(user_id = %user_id, error = %e, "Ignoring malformed remote progress update"),
                }
            }
            tracing::debug!(user_id = %user_id, "Remote progress subscription ended");
        });

        if let Some(previous) = self.listener.lock().await.replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    /// Hydrate and listen whenever a (different) user signs in.
    pub fn follow_auth(self: &Arc<Self>) -> JoinHandle<()> {
        let gateway = Arc::clone(self);
        let mut sessions = self.auth.watch();
        tokio::spawn(async move {
            let mut current: Option<String> = None;
            loop {
                let signed_in = sessions
                    .borrow_and_update()
                    .authenticated_user()
                    .map(str::to_string);
                if signed_in.is_some() && signed_in != current {
                    // Errors are logged inside hydrate and listen.
                    let _ = gateway.hydrate().await;
                    let _ = gateway.listen().await;
                }
                current = signed_in;
                if sessions.changed().await.is_err() {
                    return;
                }
            }
        })
    }
}
