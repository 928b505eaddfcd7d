//! Progress record aggregate - one user's progress across both game modes
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: partitions are only reachable through accessors
//! - **Dual partition**: `pvp` and `pve` always exist; `current_game_mode`
//!   selects the active one
//! - **Domain events**: mutations return a [`ProgressChange`]
//! - **Exclusive status**: a quest is completed, failed, or neither
//!   ([`QuestStatus`]), never both
//!
//! Only migrated documents deserialize into [`UserProgress`]; legacy shapes
//! go through [`crate::migration::StoredProgress`] first.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::common::{merge_json, serde_helpers};
use crate::error::DomainError;
use crate::events::{ProgressChange, ResetScope};
use crate::ids::{ItemRequirementId, ModuleId, ObjectiveId, QuestId, TraderId};
use crate::value_objects::{
    Completion, Faction, GameMode, ObjectiveProgress, QuestStatus, DEFAULT_GAME_EDITION,
};

const DEFAULT_LEVEL: u32 = 1;

/// Progress within one game mode.
///
/// Fields read leniently: a `null` or mistyped scalar falls back to its
/// default and an unreadable map entry is skipped, so one bad value never
/// costs the rest of the partition. Keys this build does not model are kept
/// in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressData {
    #[serde(deserialize_with = "level_or_default")]
    level: u32,
    /// Faction name as written, so names outside [`Faction`] round-trip.
    #[serde(deserialize_with = "faction_or_default")]
    pmc_faction: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::default_on_invalid"
    )]
    display_name: Option<String>,
    #[serde(deserialize_with = "serde_helpers::lenient_map")]
    task_completions: HashMap<QuestId, QuestStatus>,
    #[serde(deserialize_with = "serde_helpers::lenient_map")]
    task_objectives: HashMap<ObjectiveId, ObjectiveProgress>,
    #[serde(deserialize_with = "serde_helpers::lenient_map")]
    hideout_modules: HashMap<ModuleId, Completion>,
    #[serde(deserialize_with = "serde_helpers::lenient_map")]
    hideout_parts: HashMap<ItemRequirementId, Completion>,
    #[serde(deserialize_with = "serde_helpers::lenient_map")]
    trader_levels: HashMap<TraderId, u32>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            pmc_faction: Faction::default().as_str().to_string(),
            display_name: None,
            task_completions: HashMap::new(),
            task_objectives: HashMap::new(),
            hideout_modules: HashMap::new(),
            hideout_parts: HashMap::new(),
            trader_levels: HashMap::new(),
            extra: Map::new(),
        }
    }
}

fn level_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_helpers::lenient_u32(raw).unwrap_or(DEFAULT_LEVEL))
}

fn faction_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => name,
        _ => Faction::default().as_str().to_string(),
    })
}

fn edition_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_helpers::lenient_u32(raw).unwrap_or(DEFAULT_GAME_EDITION))
}

impl ProgressData {
    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn pmc_faction(&self) -> Faction {
        Faction::from_name(&self.pmc_faction)
    }

    /// The stored faction name, including names [`Faction`] does not model.
    pub fn pmc_faction_name(&self) -> &str {
        &self.pmc_faction
    }

    /// Stored fields outside the modelled schema.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Display name, treating an empty stored name as unset.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .and_then(crate::common::none_if_empty)
    }

    pub fn quest_status(&self, quest_id: &str) -> QuestStatus {
        self.task_completions
            .get(quest_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn is_quest_complete(&self, quest_id: &str) -> bool {
        self.quest_status(quest_id).is_complete()
    }

    pub fn is_quest_failed(&self, quest_id: &str) -> bool {
        self.quest_status(quest_id).is_failed()
    }

    pub fn task_completions(&self) -> &HashMap<QuestId, QuestStatus> {
        &self.task_completions
    }

    pub fn is_objective_complete(&self, objective_id: &str) -> bool {
        self.task_objectives
            .get(objective_id)
            .is_some_and(|objective| objective.complete)
    }

    pub fn objective_count(&self, objective_id: &str) -> u32 {
        self.task_objectives
            .get(objective_id)
            .map_or(0, |objective| objective.count)
    }

    pub fn is_module_complete(&self, module_id: &str) -> bool {
        self.hideout_modules
            .get(module_id)
            .is_some_and(|module| module.complete)
    }

    pub fn hideout_modules(&self) -> &HashMap<ModuleId, Completion> {
        &self.hideout_modules
    }

    pub fn is_part_complete(&self, requirement_id: &str) -> bool {
        self.hideout_parts
            .get(requirement_id)
            .is_some_and(|part| part.complete)
    }

    /// Explicit per-trader level, if one was recorded.
    pub fn trader_level(&self, trader_id: &str) -> Option<u32> {
        self.trader_levels.get(trader_id).copied()
    }

    // =========================================================================
    // Mutations (previous value returned; events are built by UserProgress)
    // =========================================================================

    fn set_quest_status(&mut self, quest_id: QuestId, status: QuestStatus) -> QuestStatus {
        self.task_completions
            .insert(quest_id, status)
            .unwrap_or_default()
    }

    fn set_objective_complete(&mut self, objective_id: ObjectiveId, complete: bool) {
        self.task_objectives.entry(objective_id).or_default().complete = complete;
    }

    fn set_objective_count(&mut self, objective_id: ObjectiveId, count: u32) {
        self.task_objectives.entry(objective_id).or_default().count = count;
    }

    fn set_module_complete(&mut self, module_id: ModuleId, complete: bool) {
        self.hideout_modules
            .insert(module_id, Completion { complete });
    }

    fn set_part_complete(&mut self, requirement_id: ItemRequirementId, complete: bool) {
        self.hideout_parts
            .insert(requirement_id, Completion { complete });
    }

    // =========================================================================
    // Builders (tests and fixtures)
    // =========================================================================

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.pmc_faction = faction.as_str().to_string();
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_quest_status(mut self, quest_id: impl Into<QuestId>, status: QuestStatus) -> Self {
        self.set_quest_status(quest_id.into(), status);
        self
    }

    pub fn with_objective_complete(mut self, objective_id: impl Into<ObjectiveId>) -> Self {
        self.set_objective_complete(objective_id.into(), true);
        self
    }

    pub fn with_module_complete(mut self, module_id: impl Into<ModuleId>) -> Self {
        self.set_module_complete(module_id.into(), true);
        self
    }

    pub fn with_part_complete(mut self, requirement_id: impl Into<ItemRequirementId>) -> Self {
        self.set_part_complete(requirement_id.into(), true);
        self
    }

    pub fn with_trader_level(mut self, trader_id: impl Into<TraderId>, level: u32) -> Self {
        self.trader_levels.insert(trader_id.into(), level);
        self
    }
}

/// A user's progress record: edition, active mode, and both partitions.
///
/// # Invariants
///
/// - Both partitions always exist
/// - Exactly one partition is current, selected by `current_game_mode`
///
/// # Example
///
/// ```
/// use questline_domain::aggregates::UserProgress;
/// use questline_domain::value_objects::GameMode;
///
/// let mut progress = UserProgress::default();
/// progress.complete_quest("5936d90786f7742b1420ba5b".into());
/// assert!(progress.current().is_quest_complete("5936d90786f7742b1420ba5b"));
///
/// progress.switch_game_mode(GameMode::Pve);
/// assert!(!progress.current().is_quest_complete("5936d90786f7742b1420ba5b"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    current_game_mode: GameMode,
    #[serde(default = "default_game_edition", deserialize_with = "edition_or_default")]
    game_edition: u32,
    #[serde(default)]
    pvp: ProgressData,
    #[serde(default)]
    pve: ProgressData,
}

fn default_game_edition() -> u32 {
    DEFAULT_GAME_EDITION
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            current_game_mode: GameMode::default(),
            game_edition: DEFAULT_GAME_EDITION,
            pvp: ProgressData::default(),
            pve: ProgressData::default(),
        }
    }
}

impl UserProgress {
    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn current_game_mode(&self) -> GameMode {
        self.current_game_mode
    }

    pub fn game_edition(&self) -> u32 {
        self.game_edition
    }

    pub fn partition(&self, mode: GameMode) -> &ProgressData {
        match mode {
            GameMode::Pvp => &self.pvp,
            GameMode::Pve => &self.pve,
        }
    }

    fn partition_mut(&mut self, mode: GameMode) -> &mut ProgressData {
        match mode {
            GameMode::Pvp => &mut self.pvp,
            GameMode::Pve => &mut self.pve,
        }
    }

    /// The partition for the active game mode.
    pub fn current(&self) -> &ProgressData {
        self.partition(self.current_game_mode)
    }

    fn current_mut(&mut self) -> &mut ProgressData {
        self.partition_mut(self.current_game_mode)
    }

    // =========================================================================
    // Quest mutations (current partition)
    // =========================================================================

    pub fn complete_quest(&mut self, quest_id: QuestId) -> ProgressChange {
        self.set_quest_status(quest_id, QuestStatus::Completed)
    }

    /// Clears both completion and failure.
    pub fn uncomplete_quest(&mut self, quest_id: QuestId) -> ProgressChange {
        self.set_quest_status(quest_id, QuestStatus::Incomplete)
    }

    /// Marks a quest failed, clearing any completion.
    pub fn fail_quest(&mut self, quest_id: QuestId) -> ProgressChange {
        self.set_quest_status(quest_id, QuestStatus::Failed)
    }

    fn set_quest_status(&mut self, quest_id: QuestId, status: QuestStatus) -> ProgressChange {
        let mode = self.current_game_mode;
        let from = self
            .current_mut()
            .set_quest_status(quest_id.clone(), status);
        ProgressChange::QuestStatusChanged {
            mode,
            quest_id,
            from,
            to: status,
        }
    }

    pub fn set_objective_complete(
        &mut self,
        objective_id: ObjectiveId,
        complete: bool,
    ) -> ProgressChange {
        let mode = self.current_game_mode;
        self.current_mut()
            .set_objective_complete(objective_id.clone(), complete);
        ProgressChange::ObjectiveChanged {
            mode,
            objective_id,
            complete,
        }
    }

    pub fn set_objective_count(&mut self, objective_id: ObjectiveId, count: u32) -> ProgressChange {
        let mode = self.current_game_mode;
        self.current_mut()
            .set_objective_count(objective_id.clone(), count);
        ProgressChange::ObjectiveCountChanged {
            mode,
            objective_id,
            count,
        }
    }

    // =========================================================================
    // Hideout mutations (current partition)
    // =========================================================================

    pub fn set_module_complete(&mut self, module_id: ModuleId, complete: bool) -> ProgressChange {
        let mode = self.current_game_mode;
        self.current_mut()
            .set_module_complete(module_id.clone(), complete);
        ProgressChange::ModuleChanged {
            mode,
            module_id,
            complete,
        }
    }

    pub fn set_part_complete(
        &mut self,
        requirement_id: ItemRequirementId,
        complete: bool,
    ) -> ProgressChange {
        let mode = self.current_game_mode;
        self.current_mut()
            .set_part_complete(requirement_id.clone(), complete);
        ProgressChange::PartChanged {
            mode,
            requirement_id,
            complete,
        }
    }

    // =========================================================================
    // Scalar mutations
    // =========================================================================

    pub fn set_level(&mut self, level: u32) -> ProgressChange {
        let mode = self.current_game_mode;
        let from = std::mem::replace(&mut self.current_mut().level, level);
        ProgressChange::LevelChanged {
            mode,
            from,
            to: level,
        }
    }

    pub fn set_faction(&mut self, faction: Faction) -> ProgressChange {
        let mode = self.current_game_mode;
        let data = self.current_mut();
        let from = data.pmc_faction();
        data.pmc_faction = faction.as_str().to_string();
        ProgressChange::FactionChanged {
            mode,
            from,
            to: faction,
        }
    }

    pub fn set_display_name(&mut self, name: Option<String>) -> ProgressChange {
        let mode = self.current_game_mode;
        let name = name.and_then(crate::common::some_if_not_empty);
        self.current_mut().display_name = name.clone();
        ProgressChange::DisplayNameChanged { mode, to: name }
    }

    pub fn set_trader_level(&mut self, trader_id: TraderId, level: u32) -> ProgressChange {
        let mode = self.current_game_mode;
        self.current_mut()
            .trader_levels
            .insert(trader_id.clone(), level);
        ProgressChange::TraderLevelChanged {
            mode,
            trader_id,
            level,
        }
    }

    /// Edition applies to the whole record, not one partition.
    pub fn set_game_edition(&mut self, edition: u32) -> ProgressChange {
        let from = std::mem::replace(&mut self.game_edition, edition);
        ProgressChange::GameEditionChanged { from, to: edition }
    }

    pub fn switch_game_mode(&mut self, mode: GameMode) -> ProgressChange {
        let from = std::mem::replace(&mut self.current_game_mode, mode);
        ProgressChange::GameModeSwitched { from, to: mode }
    }

    // =========================================================================
    // Resets
    // =========================================================================

    /// Back to a fresh record: default edition, pvp active, empty partitions.
    pub fn reset_all(&mut self) -> ProgressChange {
        *self = Self::default();
        ProgressChange::Reset {
            scope: ResetScope::AllModes,
        }
    }

    /// Clears one partition, leaving the other, the edition, and the active
    /// mode untouched.
    pub fn reset_mode(&mut self, mode: GameMode) -> ProgressChange {
        *self.partition_mut(mode) = ProgressData::default();
        ProgressChange::Reset {
            scope: ResetScope::Mode(mode),
        }
    }

    // =========================================================================
    // Remote patches
    // =========================================================================

    /// Deep-merge a partial document into this record.
    ///
    /// Keys absent from `patch` keep their local values. Partition fields
    /// read leniently; an unknown game mode fails the patch and leaves the
    /// record unchanged.
    pub fn apply_patch(&mut self, patch: Value) -> Result<ProgressChange, DomainError> {
        let mut document = serde_json::to_value(&*self)?;
        merge_json(&mut document, patch);
        *self = serde_json::from_value(document)?;
        Ok(ProgressChange::RemotePatched)
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn with_game_edition(mut self, edition: u32) -> Self {
        self.game_edition = edition;
        self
    }

    pub fn with_game_mode(mut self, mode: GameMode) -> Self {
        self.current_game_mode = mode;
        self
    }

    pub fn with_partition(mut self, mode: GameMode, data: ProgressData) -> Self {
        *self.partition_mut(mode) = data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod partitions {
        use super::*;

        #[test]
        fn mutations_touch_only_the_current_partition() {
            let mut progress = UserProgress::default();
            progress.set_level(20);
            progress.complete_quest("q1".into());

            assert_eq!(progress.partition(GameMode::Pvp).level(), 20);
            assert_eq!(progress.partition(GameMode::Pve).level(), 1);
            assert!(!progress.partition(GameMode::Pve).is_quest_complete("q1"));
        }

        #[test]
        fn switching_mode_changes_current_partition() {
            let mut progress = UserProgress::default();
            let change = progress.switch_game_mode(GameMode::Pve);
            assert_eq!(
                change,
                ProgressChange::GameModeSwitched {
                    from: GameMode::Pvp,
                    to: GameMode::Pve
                }
            );
            progress.set_level(7);
            assert_eq!(progress.current().level(), 7);
            assert_eq!(progress.partition(GameMode::Pvp).level(), 1);
        }
    }

    mod quest_status {
        use super::*;

        #[test]
        fn failing_clears_completion() {
            let mut progress = UserProgress::default();
            progress.complete_quest("q1".into());
            let change = progress.fail_quest("q1".into());

            assert_eq!(
                change,
                ProgressChange::QuestStatusChanged {
                    mode: GameMode::Pvp,
                    quest_id: "q1".into(),
                    from: QuestStatus::Completed,
                    to: QuestStatus::Failed,
                }
            );
            assert!(progress.current().is_quest_failed("q1"));
            assert!(!progress.current().is_quest_complete("q1"));
        }

        #[test]
        fn uncomplete_keeps_entry_as_incomplete() {
            let mut progress = UserProgress::default();
            progress.complete_quest("q1".into());
            progress.uncomplete_quest("q1".into());

            let json = serde_json::to_value(&progress).unwrap();
            assert_eq!(
                json["pvp"]["taskCompletions"]["q1"],
                json!({"complete": false, "failed": false})
            );
        }
    }

    mod serde_shape {
        use super::*;

        #[test]
        fn accepts_string_edition() {
            let progress: UserProgress = serde_json::from_value(json!({
                "currentGameMode": "pve",
                "gameEdition": "4",
                "pvp": {},
                "pve": {"level": 33}
            }))
            .unwrap();
            assert_eq!(progress.game_edition(), 4);
            assert_eq!(progress.current_game_mode(), GameMode::Pve);
            assert_eq!(progress.current().level(), 33);
        }

        #[test]
        fn empty_display_name_reads_as_unset() {
            let data: ProgressData =
                serde_json::from_value(json!({"displayName": ""})).unwrap();
            assert_eq!(data.display_name(), None);
        }

        #[test]
        fn unmodelled_fields_round_trip() {
            let data: ProgressData = serde_json::from_value(json!({
                "level": 12,
                "xpOffset": 500,
                "skills": {"endurance": 5}
            }))
            .unwrap();

            assert_eq!(data.extra().get("xpOffset"), Some(&json!(500)));
            let written = serde_json::to_value(&data).unwrap();
            assert_eq!(written["xpOffset"], json!(500));
            assert_eq!(written["skills"], json!({"endurance": 5}));
            assert_eq!(written["level"], json!(12));
        }

        #[test]
        fn unknown_faction_name_is_kept() {
            let data: ProgressData = serde_json::from_value(json!({"pmcFaction": "Scav"})).unwrap();

            assert_eq!(data.pmc_faction(), Faction::Unknown);
            assert_eq!(data.pmc_faction_name(), "Scav");
            let written = serde_json::to_value(&data).unwrap();
            assert_eq!(written["pmcFaction"], json!("Scav"));
        }

        #[test]
        fn null_scalars_keep_the_rest_of_the_partition() {
            let data: ProgressData = serde_json::from_value(json!({
                "level": null,
                "pmcFaction": null,
                "displayName": 42,
                "taskCompletions": {"q1": {"complete": true}, "q2": null},
                "traderLevels": {"prapor": 3, "therapist": "high"}
            }))
            .unwrap();

            assert_eq!(data.level(), 1);
            assert_eq!(data.pmc_faction(), Faction::Usec);
            assert_eq!(data.display_name(), None);
            assert!(data.is_quest_complete("q1"));
            assert_eq!(data.task_completions().len(), 1);
            assert_eq!(data.trader_level("prapor"), Some(3));
            assert_eq!(data.trader_level("therapist"), None);
        }

        #[test]
        fn level_accepts_numeric_text() {
            let data: ProgressData = serde_json::from_value(json!({"level": "23"})).unwrap();
            assert_eq!(data.level(), 23);
        }

        #[test]
        fn mistyped_edition_reads_as_default() {
            let progress: UserProgress = serde_json::from_value(json!({
                "currentGameMode": "pvp",
                "gameEdition": "gold",
                "pvp": {},
                "pve": {}
            }))
            .unwrap();
            assert_eq!(progress.game_edition(), DEFAULT_GAME_EDITION);
        }

        #[test]
        fn partition_defaults() {
            let data = ProgressData::default();
            assert_eq!(data.level(), 1);
            assert_eq!(data.pmc_faction(), Faction::Usec);
            assert_eq!(data.objective_count("o1"), 0);
            assert_eq!(data.trader_level("prapor"), None);
        }
    }

    mod resets {
        use super::*;

        #[test]
        fn reset_mode_keeps_other_partition() {
            let mut progress = UserProgress::default().with_game_edition(5);
            progress.set_level(30);
            progress.switch_game_mode(GameMode::Pve);
            progress.set_level(12);

            progress.reset_mode(GameMode::Pve);

            assert_eq!(progress.partition(GameMode::Pve).level(), 1);
            assert_eq!(progress.partition(GameMode::Pvp).level(), 30);
            assert_eq!(progress.game_edition(), 5);
            assert_eq!(progress.current_game_mode(), GameMode::Pve);
        }

        #[test]
        fn reset_all_restores_defaults() {
            let mut progress = UserProgress::default()
                .with_game_edition(6)
                .with_game_mode(GameMode::Pve);
            progress.set_level(40);
            progress.reset_all();
            assert_eq!(progress, UserProgress::default());
        }
    }

    mod patches {
        use super::*;

        #[test]
        fn patch_keeps_fields_absent_from_payload() {
            let mut progress = UserProgress::default();
            progress.set_level(15);
            progress.complete_quest("q1".into());

            let change = progress
                .apply_patch(json!({"pvp": {"taskCompletions": {"q2": {"complete": true}}}}))
                .unwrap();

            assert_eq!(change, ProgressChange::RemotePatched);
            assert_eq!(progress.current().level(), 15);
            assert!(progress.current().is_quest_complete("q1"));
            assert!(progress.current().is_quest_complete("q2"));
        }

        #[test]
        fn patch_keeps_unmodelled_fields() {
            let mut progress: UserProgress = serde_json::from_value(json!({
                "currentGameMode": "pvp",
                "gameEdition": 1,
                "pvp": {"level": 5, "skills": {"endurance": 5}},
                "pve": {}
            }))
            .unwrap();

            progress.apply_patch(json!({"pvp": {"level": 6}})).unwrap();
            progress.set_level(21);

            let written = serde_json::to_value(progress.partition(GameMode::Pvp)).unwrap();
            assert_eq!(written["skills"], json!({"endurance": 5}));
            assert_eq!(written["level"], json!(21));
        }

        #[test]
        fn invalid_patch_leaves_record_unchanged() {
            let mut progress = UserProgress::default();
            progress.set_level(15);
            let before = progress.clone();

            let result = progress.apply_patch(json!({"currentGameMode": "arena"}));

            assert!(matches!(result, Err(DomainError::Parse(_))));
            assert_eq!(progress, before);
        }
    }
}
