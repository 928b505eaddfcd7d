//! Teammate mirroring - read-only copies of other users' progress rows.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use questline_domain::{StoredProgress, UserProgress};

use crate::infrastructure::config::SyncConfig;
use crate::infrastructure::ports::{RemoteStore, RowFilter, SyncError};
use crate::stores::{TeamStore, TeammateState};

use super::row::ProgressRow;

pub struct TeammateSync {
    remote: Arc<dyn RemoteStore>,
    team: Arc<TeamStore>,
    config: SyncConfig,
}

impl TeammateSync {
    pub fn new(remote: Arc<dyn RemoteStore>, team: Arc<TeamStore>, config: SyncConfig) -> Self {
        Self {
            remote,
            team,
            config,
        }
    }

    /// Fetch a teammate's row and mirror it. Returns `false` when the teammate
    /// has no usable row yet; they stay registered but absent from every
    /// aggregate.
    pub async fn refresh(&self, identity: &str) -> Result<bool, SyncError> {
        if self.team.get_or_create(identity).await {
            tracing::debug!(teammate = %identity, "Registered teammate");
        }
        load_into(self.remote.as_ref(), &self.team, &self.config.table, identity).await
    }

    /// Keep a teammate's mirror current from realtime row updates.
    ///
    /// Updates patch a loaded mirror. Until the mirror is loaded, an update
    /// only signals that a row exists; the full row is fetched instead of
    /// trusting a payload that may carry a subset of columns.
    pub async fn follow(&self, identity: &str) -> Result<JoinHandle<()>, SyncError> {
        self.team.get_or_create(identity).await;
        let mut subscription = self
            .remote
            .subscribe(&self.config.table, RowFilter::user(identity))
            .await?;
        let remote = Arc::clone(&self.remote);
        let team = Arc::clone(&self.team);
        let table = self.config.table.clone();
        let identity = identity.to_string();

        Ok(tokio::spawn(async move {
            while let Some(value) = subscription.next().await {
                let Some(TeammateState::Loaded(mut progress)) = team.state(&identity).await else {
                    if let Err(e) = load_into(remote.as_ref(), &team, &table, &identity).await {
                        tracing::warn!(teammate = %identity, error = %e, "Could not load teammate after update");
                    }
                    continue;
                };
                let patched = ProgressRow::from_value(value)
                    .and_then(|row| progress.apply_patch(row.into_patch()).map_err(SyncError::from));
                match patched {
                    Ok(_) => team.mirror(&identity, progress).await,
                    Err(e) => {
                        tracing::warn!(teammate = %identity, error = %e, "Ignoring malformed teammate update")
                    }
                }
            }
        }))
    }
}

async fn load_into(
    remote: &dyn RemoteStore,
    team: &TeamStore,
    table: &str,
    identity: &str,
) -> Result<bool, SyncError> {
    let row = remote
        .select_one(table, &RowFilter::user(identity))
        .await
        .map_err(|e| {
            tracing::error!(teammate = %identity, error = %e, "Error loading teammate progress");
            e
        })?;

    let Some(row) = row else {
        tracing::debug!(teammate = %identity, "Teammate has no progress row yet");
        return Ok(false);
    };
    let Some(progress) = teammate_progress(row)? else {
        tracing::debug!(teammate = %identity, "Teammate row carries no progress partition yet");
        return Ok(false);
    };

    team.mirror(identity, progress).await;
    Ok(true)
}

/// Build a teammate's record from a stored row, migrating older shapes.
///
/// A row without either partition holds no progress and yields `None`.
fn teammate_progress(row: Value) -> Result<Option<UserProgress>, SyncError> {
    let row = ProgressRow::from_value(row)?;
    let has_partition = [&row.pvp_data, &row.pve_data]
        .into_iter()
        .any(|data| matches!(data, Some(Value::Object(_))));
    if !has_partition {
        return Ok(None);
    }
    let patch = row.with_defaults().into_patch();
    Ok(Some(StoredProgress::from_document(patch)?.into_migrated()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use questline_domain::{GameMode, MemberKey};
    use serde_json::json;

    use crate::infrastructure::memory_store::InMemoryRemoteStore;

    const TABLE: &str = "user_progress";

    fn sync_with(remote: Arc<InMemoryRemoteStore>) -> (TeammateSync, Arc<TeamStore>) {
        let team = Arc::new(TeamStore::new());
        (
            TeammateSync::new(remote, team.clone(), SyncConfig::default()),
            team,
        )
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn refresh_mirrors_teammate_row() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        remote
            .seed(
                TABLE,
                json!({
                    "user_id": "mate-1",
                    "current_game_mode": "pve",
                    "game_edition": 6,
                    "pve_data": {"level": 48, "displayName": "Kolya"}
                }),
            )
            .await
            .unwrap();
        let (sync, team) = sync_with(remote);

        assert!(sync.refresh("mate-1").await.unwrap());

        let snapshot = team.snapshot(Some("me".into()), UserProgress::default()).await;
        let mate = snapshot.get(&MemberKey::new("mate-1")).unwrap();
        assert_eq!(mate.current_game_mode(), GameMode::Pve);
        assert_eq!(mate.current().level(), 48);
        assert_eq!(snapshot.display_name("mate-1"), "Kolya");
    }

    #[tokio::test]
    async fn teammate_without_row_stays_absent() {
        let (sync, team) = sync_with(Arc::new(InMemoryRemoteStore::new()));

        assert!(!sync.refresh("mate-2").await.unwrap());

        assert_eq!(team.state("mate-2").await, Some(TeammateState::Loading));
        let snapshot = team.snapshot(None, UserProgress::default()).await;
        assert_eq!(snapshot.visible().len(), 1);
    }

    #[tokio::test]
    async fn row_without_partitions_is_not_mirrored() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        remote
            .seed(TABLE, json!({"user_id": "mate-3", "game_edition": 4}))
            .await
            .unwrap();
        let (sync, team) = sync_with(remote);

        assert!(!sync.refresh("mate-3").await.unwrap());
        assert_eq!(team.state("mate-3").await, Some(TeammateState::Loading));
    }

    #[tokio::test]
    async fn follow_patches_loaded_mirror() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        remote
            .seed(TABLE, json!({"user_id": "mate-1", "pvp_data": {"level": 10}}))
            .await
            .unwrap();
        let (sync, team) = sync_with(remote.clone());
        sync.refresh("mate-1").await.unwrap();
        sync.follow("mate-1").await.unwrap();

        remote
            .upsert(TABLE, json!({"user_id": "mate-1", "pvp_data": {"level": 11}}))
            .await
            .unwrap();
        settle().await;

        let Some(TeammateState::Loaded(progress)) = team.state("mate-1").await else {
            panic!("teammate should be loaded");
        };
        assert_eq!(progress.current().level(), 11);
    }

    #[tokio::test]
    async fn partial_update_for_loading_teammate_exposes_nothing() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        let (sync, team) = sync_with(remote.clone());
        sync.follow("mate").await.unwrap();

        remote
            .upsert(TABLE, json!({"user_id": "mate", "game_edition": 4}))
            .await
            .unwrap();
        settle().await;

        assert_eq!(team.state("mate").await, Some(TeammateState::Loading));
        let snapshot = team.snapshot(Some("me".into()), UserProgress::default()).await;
        let visible: Vec<_> = snapshot.visible().keys().map(|k| k.as_str().to_string()).collect();
        assert_eq!(visible, vec!["self".to_string()]);
    }

    #[tokio::test]
    async fn update_for_loading_teammate_loads_the_full_row() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        let (sync, team) = sync_with(remote.clone());
        sync.follow("mate").await.unwrap();

        remote
            .upsert(
                TABLE,
                json!({"user_id": "mate", "game_edition": 2, "pvp_data": {"level": 30}}),
            )
            .await
            .unwrap();
        settle().await;

        let Some(TeammateState::Loaded(progress)) = team.state("mate").await else {
            panic!("teammate should be loaded");
        };
        assert_eq!(progress.current().level(), 30);
        assert_eq!(progress.game_edition(), 2);
    }
}
