//! Quest unlock evaluation
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. already complete (or itself failed)
//! 2. a failure-blocking quest is failed
//! 3. player level below the quest minimum
//! 4. a trader level below the requirement
//! 5. a prerequisite quest not complete
//! 6. faction restriction not met
//!
//! [`quest_blocker`] reports which check failed; [`is_quest_available`] is
//! the boolean view of the same evaluation.

use std::collections::HashMap;

use crate::aggregates::{ProgressData, TeamView};
use crate::entities::{Catalog, Quest};
use crate::ids::{ObjectiveId, QuestId, TraderId};
use crate::value_objects::{Faction, FactionRestriction};

use super::{EntityMemberMap, MemberMap};

/// First reason a quest is not available to a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestBlocker {
    AlreadyComplete,
    /// Failure is terminal: a failed quest never becomes available again
    Failed,
    FailedRequirement(QuestId),
    LevelTooLow {
        required: u32,
        actual: u32,
    },
    TraderLevelTooLow {
        trader_id: TraderId,
        required: u32,
        actual: u32,
    },
    PrerequisiteIncomplete(QuestId),
    FactionMismatch {
        required: FactionRestriction,
        actual: Faction,
    },
}

/// Level a member has reached with a trader.
///
/// Uses the recorded per-trader level, falling back to the player level.
pub fn achieved_trader_level(data: &ProgressData, trader_id: &str) -> u32 {
    data.trader_level(trader_id).unwrap_or_else(|| data.level())
}

pub fn quest_blocker(quest: &Quest, data: &ProgressData) -> Option<QuestBlocker> {
    if data.is_quest_complete(quest.id.as_str()) {
        return Some(QuestBlocker::AlreadyComplete);
    }
    if data.is_quest_failed(quest.id.as_str()) {
        return Some(QuestBlocker::Failed);
    }

    if let Some(failed) = quest
        .failed_requirements
        .iter()
        .find(|id| data.is_quest_failed(id.as_str()))
    {
        return Some(QuestBlocker::FailedRequirement(failed.clone()));
    }

    if data.level() < quest.min_player_level {
        return Some(QuestBlocker::LevelTooLow {
            required: quest.min_player_level,
            actual: data.level(),
        });
    }

    for requirement in &quest.trader_level_requirements {
        let actual = achieved_trader_level(data, requirement.trader_id.as_str());
        if actual < requirement.level {
            return Some(QuestBlocker::TraderLevelTooLow {
                trader_id: requirement.trader_id.clone(),
                required: requirement.level,
                actual,
            });
        }
    }

    if let Some(missing) = quest
        .task_requirements
        .iter()
        .find(|id| !data.is_quest_complete(id.as_str()))
    {
        return Some(QuestBlocker::PrerequisiteIncomplete(missing.clone()));
    }

    if !quest.faction_name.allows(data.pmc_faction()) {
        return Some(QuestBlocker::FactionMismatch {
            required: quest.faction_name,
            actual: data.pmc_faction(),
        });
    }

    None
}

pub fn is_quest_available(quest: &Quest, data: &ProgressData) -> bool {
    quest_blocker(quest, data).is_none()
}

/// `[questId][member] -> value` over every quest and visible member.
fn per_quest<F>(catalog: &Catalog, view: &TeamView<'_>, value: F) -> EntityMemberMap<QuestId, bool>
where
    F: Fn(&Quest, &ProgressData) -> bool,
{
    catalog
        .quests
        .iter()
        .map(|quest| {
            let members = view
                .iter()
                .map(|(key, progress)| (key.clone(), value(quest, progress.current())))
                .collect();
            (quest.id.clone(), members)
        })
        .collect()
}

pub fn tasks_completions(catalog: &Catalog, view: &TeamView<'_>) -> EntityMemberMap<QuestId, bool> {
    per_quest(catalog, view, |quest, data| {
        data.is_quest_complete(quest.id.as_str())
    })
}

pub fn task_failures(catalog: &Catalog, view: &TeamView<'_>) -> EntityMemberMap<QuestId, bool> {
    per_quest(catalog, view, |quest, data| {
        data.is_quest_failed(quest.id.as_str())
    })
}

pub fn unlocked_tasks(catalog: &Catalog, view: &TeamView<'_>) -> EntityMemberMap<QuestId, bool> {
    per_quest(catalog, view, is_quest_available)
}

pub fn objective_completions(
    catalog: &Catalog,
    view: &TeamView<'_>,
) -> EntityMemberMap<ObjectiveId, bool> {
    catalog
        .objective_ids()
        .map(|objective_id| {
            let members = view
                .iter()
                .map(|(key, progress)| {
                    (
                        key.clone(),
                        progress.current().is_objective_complete(objective_id.as_str()),
                    )
                })
                .collect();
            (objective_id.clone(), members)
        })
        .collect()
}

/// `[member][traderId] -> level` for every known trader.
pub fn trader_levels_achieved(
    catalog: &Catalog,
    view: &TeamView<'_>,
) -> MemberMap<HashMap<TraderId, u32>> {
    view.iter()
        .map(|(key, progress)| {
            let levels = catalog
                .traders
                .iter()
                .map(|trader| {
                    (
                        trader.id.clone(),
                        achieved_trader_level(progress.current(), trader.id.as_str()),
                    )
                })
                .collect();
            (key.clone(), levels)
        })
        .collect()
}

pub fn player_factions(view: &TeamView<'_>) -> MemberMap<Faction> {
    view.iter()
        .map(|(key, progress)| (key.clone(), progress.current().pmc_faction()))
        .collect()
}
