//! Progress actions - local edits to the user's record.
//!
//! Ordinary edits only touch local state; the sync gateway picks them up
//! off the change stream. Switching game mode and the two resets talk to the
//! remote store directly.

use std::sync::Arc;

use questline_domain::{
    Faction, GameMode, ItemRequirementId, ModuleId, ObjectiveId, ProgressChange, QuestId, TraderId,
    UserProgress,
};

use crate::infrastructure::config::SyncConfig;
use crate::infrastructure::ports::{AuthPort, RemoteStore, SyncError};
use crate::stores::LocalProgressStore;
use crate::use_cases::sync::ProgressRow;

pub struct ProgressActions {
    progress: Arc<LocalProgressStore>,
    remote: Arc<dyn RemoteStore>,
    auth: Arc<dyn AuthPort>,
    config: SyncConfig,
}

impl ProgressActions {
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
            config,
        }
    }

    // =========================================================================
    // Quests
    // =========================================================================

    pub async fn complete_quest(&self, quest_id: QuestId) -> ProgressChange {
        self.progress.mutate(|p| p.complete_quest(quest_id)).await
    }

    pub async fn uncomplete_quest(&self, quest_id: QuestId) -> ProgressChange {
        self.progress.mutate(|p| p.uncomplete_quest(quest_id)).await
    }

    pub async fn fail_quest(&self, quest_id: QuestId) -> ProgressChange {
        self.progress.mutate(|p| p.fail_quest(quest_id)).await
    }

    pub async fn set_objective_complete(&self, objective_id: ObjectiveId, complete: bool) -> ProgressChange {
        self.progress
            .mutate(|p| p.set_objective_complete(objective_id, complete))
            .await
    }

    pub async fn set_objective_count(&self, objective_id: ObjectiveId, count: u32) -> ProgressChange {
        self.progress
            .mutate(|p| p.set_objective_count(objective_id, count))
            .await
    }

    // =========================================================================
    // Hideout
    // =========================================================================

    pub async fn set_module_complete(&self, module_id: ModuleId, complete: bool) -> ProgressChange {
        self.progress
            .mutate(|p| p.set_module_complete(module_id, complete))
            .await
    }

    pub async fn set_part_complete(&self, requirement_id: ItemRequirementId, complete: bool) -> ProgressChange {
        self.progress
            .mutate(|p| p.set_part_complete(requirement_id, complete))
            .await
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub async fn set_level(&self, level: u32) -> ProgressChange {
        self.progress.mutate(|p| p.set_level(level)).await
    }

    pub async fn set_faction(&self, faction: Faction) -> ProgressChange {
        self.progress.mutate(|p| p.set_faction(faction)).await
    }

    pub async fn set_display_name(&self, name: Option<String>) -> ProgressChange {
        self.progress.mutate(|p| p.set_display_name(name)).await
    }

    pub async fn set_trader_level(&self, trader_id: TraderId, level: u32) -> ProgressChange {
        self.progress
            .mutate(|p| p.set_trader_level(trader_id, level))
            .await
    }

    pub async fn set_game_edition(&self, edition: u32) -> ProgressChange {
        self.progress.mutate(|p| p.set_game_edition(edition)).await
    }

    /// Switch the active mode and push the whole record right away.
    ///
    /// The local switch stands even if the push fails.
    pub async fn switch_game_mode(&self, mode: GameMode) -> ProgressChange {
        let change = self.progress.mutate(|p| p.switch_game_mode(mode)).await;

        let session = self.auth.session();
        let Some(user_id) = session.authenticated_user() else {
            return change;
        };

        let progress = self.progress.snapshot().await;
        let pushed = match ProgressRow::from_progress(user_id, &progress).and_then(|row| row.to_value()) {
            Ok(row) => self.remote.upsert(&self.config.table, row).await.map_err(SyncError::from),
            Err(e) => Err(e),
        };
        match pushed {
            Ok(()) => tracing::info!(user_id = %user_id, mode = %mode.as_str(), "Synced game mode switch"),
            Err(e) => tracing::error!(user_id = %user_id, error = %e, "Error syncing game mode switch"),
        }

        change
    }

    // =========================================================================
    // Resets
    // =========================================================================

    /// Reset both modes, remote first. Local state is untouched if the remote
    /// write fails.
    pub async fn reset_all_modes(&self) -> Result<ProgressChange, SyncError> {
        let user_id = self.require_user("reset all progress")?;

        let row = ProgressRow::from_progress(user_id.as_str(), &UserProgress::default())?;
        self.upsert_reset(row, "all").await?;

        Ok(self.progress.mutate(UserProgress::reset_all).await)
    }

    /// Reset only the active mode's partition, remote first.
    pub async fn reset_current_mode(&self) -> Result<ProgressChange, SyncError> {
        let user_id = self.require_user("reset game mode progress")?;
        let mode = self
            .progress
            .read(UserProgress::current_game_mode)
            .await;

        let row = ProgressRow::partition_only(user_id.as_str(), mode, &UserProgress::default())?;
        self.upsert_reset(row, mode.as_str()).await?;

        Ok(self.progress.mutate(|p| p.reset_mode(mode)).await)
    }

    fn require_user(&self, action: &'static str) -> Result<String, SyncError> {
        match self.auth.session().authenticated_user() {
            Some(user_id) => Ok(user_id.to_string()),
            None => {
                tracing::warn!(action, "User not logged in");
                Err(SyncError::Unauthenticated)
            }
        }
    }

    async fn upsert_reset(&self, row: ProgressRow, scope: &str) -> Result<(), SyncError> {
        let user_id = row.user_id.clone();
        if let Err(e) = self.remote.upsert(&self.config.table, row.to_value()?).await {
            tracing::error!(user_id = %user_id, scope, error = %e, "Error resetting remote progress");
            return Err(e.into());
        }
        tracing::info!(user_id = %user_id, scope, "Reset remote progress");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::{always, eq};
    use serde_json::json;

    use crate::infrastructure::auth::SessionAuth;
    use crate::infrastructure::memory_store::InMemoryRemoteStore;
    use crate::infrastructure::ports::{AuthSession, MockRemoteStore, StoreError};

    const TABLE: &str = "user_progress";

    fn actions_with(
        progress: Arc<LocalProgressStore>,
        remote: Arc<dyn RemoteStore>,
        auth: SessionAuth,
    ) -> ProgressActions {
        ProgressActions::new(progress, remote, Arc::new(auth), SyncConfig::default())
    }

    fn signed_in() -> SessionAuth {
        SessionAuth::new(AuthSession::signed_in("u1"))
    }

    mod edits {
        use super::*;

        #[tokio::test]
        async fn complete_and_fail_are_exclusive() {
            let progress = Arc::new(LocalProgressStore::default());
            let actions = actions_with(progress.clone(), Arc::new(InMemoryRemoteStore::new()), signed_in());

            actions.complete_quest("q1".into()).await;
            actions.fail_quest("q1".into()).await;

            let local = progress.snapshot().await;
            assert!(local.current().is_quest_failed("q1"));
            assert!(!local.current().is_quest_complete("q1"));
        }

        #[tokio::test]
        async fn edits_do_not_touch_remote_store() {
            let remote = Arc::new(InMemoryRemoteStore::new());
            let actions = actions_with(Arc::new(LocalProgressStore::default()), remote.clone(), signed_in());

            actions.set_level(30).await;
            actions.set_trader_level("prapor".into(), 3).await;
            actions.set_module_complete("stash-2".into(), true).await;

            assert!(remote.upserts().await.is_empty());
        }
    }

    mod game_mode {
        use super::*;

        #[tokio::test]
        async fn switch_pushes_full_row_immediately() {
            let remote = Arc::new(InMemoryRemoteStore::new());
            let progress = Arc::new(LocalProgressStore::default());
            let actions = actions_with(progress.clone(), remote.clone(), signed_in());
            actions.set_level(18).await;

            actions.switch_game_mode(GameMode::Pve).await;

            let row = remote.row(TABLE, "u1").await.unwrap();
            assert_eq!(row["current_game_mode"], "pve");
            assert_eq!(row["pvp_data"]["level"], 18);
            assert!(row["pve_data"].is_object());
        }

        #[tokio::test]
        async fn switch_stands_when_push_fails() {
            let mut remote = MockRemoteStore::new();
            remote
                .expect_upsert()
                .with(eq(TABLE), always())
                .times(1)
                .returning(|_, _| Err(StoreError::unavailable("offline")));
            let progress = Arc::new(LocalProgressStore::default());
            let actions = actions_with(progress.clone(), Arc::new(remote), signed_in());

            let change = actions.switch_game_mode(GameMode::Pve).await;

            assert_eq!(
                change,
                ProgressChange::GameModeSwitched {
                    from: GameMode::Pvp,
                    to: GameMode::Pve
                }
            );
            assert_eq!(progress.read(UserProgress::current_game_mode).await, GameMode::Pve);
        }

        #[tokio::test]
        async fn anonymous_switch_stays_local() {
            let remote = Arc::new(InMemoryRemoteStore::new());
            let actions = actions_with(
                Arc::new(LocalProgressStore::default()),
                remote.clone(),
                SessionAuth::anonymous(),
            );

            actions.switch_game_mode(GameMode::Pve).await;

            assert!(remote.upserts().await.is_empty());
        }
    }

    mod resets {
        use super::*;

        #[tokio::test]
        async fn reset_all_requires_user() {
            let progress = Arc::new(LocalProgressStore::default());
            progress.mutate(|p| p.set_level(44)).await;
            let actions = actions_with(
                progress.clone(),
                Arc::new(InMemoryRemoteStore::new()),
                SessionAuth::anonymous(),
            );

            let result = actions.reset_all_modes().await;

            assert!(matches!(result, Err(SyncError::Unauthenticated)));
            assert_eq!(progress.read(|p| p.current().level()).await, 44);
        }

        #[tokio::test]
        async fn reset_all_writes_defaults_remotely_then_locally() {
            let remote = Arc::new(InMemoryRemoteStore::new());
            let progress = Arc::new(LocalProgressStore::default());
            let actions = actions_with(progress.clone(), remote.clone(), signed_in());
            actions.set_game_edition(5).await;
            actions.switch_game_mode(GameMode::Pve).await;
            actions.set_level(50).await;

            actions.reset_all_modes().await.unwrap();

            let row = remote.row(TABLE, "u1").await.unwrap();
            assert_eq!(row["current_game_mode"], "pvp");
            assert_eq!(row["game_edition"], 1);
            assert_eq!(progress.snapshot().await, UserProgress::default());
        }

        #[tokio::test]
        async fn reset_current_mode_keeps_other_partition() {
            let remote = Arc::new(InMemoryRemoteStore::new());
            remote
                .seed(
                    TABLE,
                    json!({"user_id": "u1", "pvp_data": {"level": 20}, "pve_data": {"level": 35}}),
                )
                .await
                .unwrap();
            let progress = Arc::new(LocalProgressStore::default());
            let actions = actions_with(progress.clone(), remote.clone(), signed_in());
            actions.set_level(20).await;
            progress
                .mutate(|p| {
                    p.switch_game_mode(GameMode::Pve);
                    p.set_level(35)
                })
                .await;

            actions.reset_current_mode().await.unwrap();

            let row = remote.row(TABLE, "u1").await.unwrap();
            assert_eq!(row["pvp_data"]["level"], 20);
            assert_eq!(row["pve_data"]["level"], 1);
            let local = progress.snapshot().await;
            assert_eq!(local.partition(GameMode::Pvp).level(), 20);
            assert_eq!(local.partition(GameMode::Pve).level(), 1);
        }

        #[tokio::test]
        async fn failed_remote_reset_leaves_local_state() {
            let mut remote = MockRemoteStore::new();
            remote
                .expect_upsert()
                .times(1)
                .returning(|_, _| Err(StoreError::database("upsert", "constraint failed")));
            let progress = Arc::new(LocalProgressStore::default());
            progress.mutate(|p| p.set_level(27)).await;
            let actions = actions_with(progress.clone(), Arc::new(remote), signed_in());

            let result = actions.reset_current_mode().await;

            assert!(matches!(result, Err(SyncError::Store(_))));
            assert_eq!(progress.read(|p| p.current().level()).await, 27);
        }
    }
}
