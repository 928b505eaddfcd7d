//! Read-side progress queries over the local record, mirrored teammates and
//! the current definitions.

use std::sync::Arc;

use questline_domain::resolver::{displayed_station_level, quest_blocker};
use questline_domain::{
    edition_title, DashboardStats, DomainError, Faction, MemberKey, ProgressSnapshot, QuestBlocker,
    QuestStatus, Team,
};

use crate::infrastructure::ports::AuthPort;
use crate::stores::{CatalogStore, LocalProgressStore, TeamStore};

pub struct ProgressQueries {
    progress: Arc<LocalProgressStore>,
    team: Arc<TeamStore>,
    catalog: Arc<CatalogStore>,
    auth: Arc<dyn AuthPort>,
}

impl ProgressQueries {
    pub fn new(
        progress: Arc<LocalProgressStore>,
        team: Arc<TeamStore>,
        catalog: Arc<CatalogStore>,
        auth: Arc<dyn AuthPort>,
    ) -> Self {
        Self {
            progress,
            team,
            catalog,
            auth,
        }
    }

    /// The team as it stands now, local user under `self`.
    pub async fn team(&self) -> Team {
        let local = self.progress.snapshot().await;
        let identity = self
            .auth
            .session()
            .authenticated_user()
            .map(str::to_string);
        self.team.snapshot(identity, local).await
    }

    /// Every derived map for the visible team.
    pub async fn snapshot(&self) -> ProgressSnapshot {
        let catalog = self.catalog.get().await;
        let team = self.team().await;
        ProgressSnapshot::compute(&catalog, &team)
    }

    pub async fn is_available(&self, quest_id: &str, raw_identity: &str) -> bool {
        let team = self.team().await;
        let key = team.member_key(raw_identity);
        self.snapshot().await.is_available(quest_id, key.as_str())
    }

    /// Why the local user cannot start `quest_id`, if anything.
    pub async fn quest_blocker(&self, quest_id: &str) -> Result<Option<QuestBlocker>, DomainError> {
        let catalog = self.catalog.get().await;
        let quest = catalog
            .quest(quest_id)
            .ok_or_else(|| DomainError::not_found("Quest", quest_id))?;
        Ok(self
            .progress
            .read(|progress| quest_blocker(quest, progress.current()))
            .await)
    }

    /// Displayed level of one station for the local user.
    pub async fn station_level(&self, station_id: &str) -> Result<u32, DomainError> {
        let catalog = self.catalog.get().await;
        let station = catalog
            .stations
            .iter()
            .find(|station| station.id.as_str() == station_id)
            .ok_or_else(|| DomainError::not_found("Station", station_id))?;
        Ok(self
            .progress
            .read(|progress| displayed_station_level(station, progress))
            .await)
    }

    pub async fn member_key(&self, raw_identity: &str) -> MemberKey {
        self.team().await.member_key(raw_identity)
    }

    pub async fn display_name(&self, raw_identity: &str) -> String {
        self.team().await.display_name(raw_identity)
    }

    pub async fn level(&self, raw_identity: &str) -> u32 {
        self.team().await.level(raw_identity)
    }

    pub async fn faction(&self, key: &str) -> Faction {
        self.team().await.faction(key)
    }

    pub async fn task_status(&self, raw_identity: &str, quest_id: &str) -> QuestStatus {
        self.team().await.task_status(raw_identity, quest_id)
    }

    pub async fn has_completed_task(&self, raw_identity: &str, quest_id: &str) -> bool {
        self.team().await.has_completed_task(raw_identity, quest_id)
    }

    pub async fn progress_percentage(&self, raw_identity: &str, category: &str) -> f64 {
        self.team().await.progress_percentage(raw_identity, category)
    }

    /// Dashboard counts for the local user.
    pub async fn dashboard(&self) -> DashboardStats {
        let catalog = self.catalog.get().await;
        self.progress
            .read(|progress| DashboardStats::compute(&catalog, progress))
            .await
    }

    pub async fn edition_title(&self) -> String {
        let edition = self.progress.read(|progress| progress.game_edition()).await;
        edition_title(Some(edition))
    }
}
