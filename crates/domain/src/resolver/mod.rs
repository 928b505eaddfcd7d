//! Availability resolver - pure derivations over definitions and team records
//!
//! Every function here is total: missing definitions produce empty maps and
//! missing progress falls back to defaults. Maps are keyed
//! `[entityId][memberKey]` and only include visible members.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::aggregates::Team;
use crate::entities::Catalog;
use crate::ids::{ItemRequirementId, MemberKey, ModuleId, ObjectiveId, QuestId, StationId, TraderId};
use crate::value_objects::Faction;

pub mod quests;
pub mod stations;
pub mod stats;

pub use quests::{
    achieved_trader_level, is_quest_available, objective_completions, player_factions,
    quest_blocker, task_failures, tasks_completions, trader_levels_achieved, unlocked_tasks,
    QuestBlocker,
};
pub use stations::{
    displayed_station_level, hideout_levels, highest_built_level, is_level_built,
    module_completions, module_part_completions, stash_display_level, StationRule,
};
pub use stats::{percentage, DashboardStats};

/// Values per team member.
pub type MemberMap<V> = BTreeMap<MemberKey, V>;

/// Values per entity, then per team member.
pub type EntityMemberMap<K, V> = HashMap<K, MemberMap<V>>;

/// Every derived map, computed together for one state of the team.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub tasks_completions: EntityMemberMap<QuestId, bool>,
    pub task_failures: EntityMemberMap<QuestId, bool>,
    pub unlocked_tasks: EntityMemberMap<QuestId, bool>,
    pub objective_completions: EntityMemberMap<ObjectiveId, bool>,
    pub trader_levels_achieved: MemberMap<HashMap<TraderId, u32>>,
    pub player_factions: MemberMap<Faction>,
    pub hideout_levels: EntityMemberMap<StationId, u32>,
    pub module_completions: EntityMemberMap<ModuleId, bool>,
    pub module_part_completions: EntityMemberMap<ItemRequirementId, bool>,
}

impl ProgressSnapshot {
    pub fn compute(catalog: &Catalog, team: &Team) -> Self {
        let view = team.visible();
        Self {
            tasks_completions: tasks_completions(catalog, &view),
            task_failures: task_failures(catalog, &view),
            unlocked_tasks: unlocked_tasks(catalog, &view),
            objective_completions: objective_completions(catalog, &view),
            trader_levels_achieved: trader_levels_achieved(catalog, &view),
            player_factions: player_factions(&view),
            hideout_levels: hideout_levels(catalog, &view),
            module_completions: module_completions(catalog, &view),
            module_part_completions: module_part_completions(catalog, &view),
        }
    }

    /// Whether `quest_id` is available to `member`; `false` when either is unknown.
    pub fn is_available(&self, quest_id: &str, member: &str) -> bool {
        self.unlocked_tasks
            .get(quest_id)
            .and_then(|members| members.get(member))
            .copied()
            .unwrap_or(false)
    }
}
