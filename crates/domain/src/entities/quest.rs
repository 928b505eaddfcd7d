//! Quest definitions - read-only input supplied by the definitions source
//!
//! A quest gates on prerequisite quests, quests whose failure blocks it,
//! a minimum player level, trader levels, and a faction restriction.

use serde::{Deserialize, Serialize};

use questline_domain::{FactionRestriction, ObjectiveId, QuestId, TraderId};

/// A quest as delivered by the definitions source.
///
/// Simple data struct: any combination of values is a valid definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: QuestId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub trader_id: Option<TraderId>,
    /// 0 means no level gate
    #[serde(default)]
    pub min_player_level: u32,
    /// Quests that must be complete
    #[serde(default)]
    pub task_requirements: Vec<QuestId>,
    /// Quests whose failure blocks this one
    #[serde(default)]
    pub failed_requirements: Vec<QuestId>,
    #[serde(default)]
    pub trader_level_requirements: Vec<TraderLevelRequirement>,
    #[serde(default)]
    pub faction_name: FactionRestriction,
    #[serde(default)]
    pub objectives: Vec<QuestObjective>,
    #[serde(default)]
    pub kappa_required: bool,
}

impl Quest {
    pub fn new(id: impl Into<QuestId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trader_id: None,
            min_player_level: 0,
            task_requirements: Vec::new(),
            failed_requirements: Vec::new(),
            trader_level_requirements: Vec::new(),
            faction_name: FactionRestriction::Any,
            objectives: Vec::new(),
            kappa_required: false,
        }
    }

    pub fn with_trader(mut self, trader_id: impl Into<TraderId>) -> Self {
        self.trader_id = Some(trader_id.into());
        self
    }

    pub fn with_min_player_level(mut self, level: u32) -> Self {
        self.min_player_level = level;
        self
    }

    pub fn with_prerequisite(mut self, quest_id: impl Into<QuestId>) -> Self {
        self.task_requirements.push(quest_id.into());
        self
    }

    pub fn with_failure_blocker(mut self, quest_id: impl Into<QuestId>) -> Self {
        self.failed_requirements.push(quest_id.into());
        self
    }

    pub fn with_trader_level(mut self, trader_id: impl Into<TraderId>, level: u32) -> Self {
        self.trader_level_requirements.push(TraderLevelRequirement {
            trader_id: trader_id.into(),
            level,
        });
        self
    }

    pub fn with_faction(mut self, restriction: FactionRestriction) -> Self {
        self.faction_name = restriction;
        self
    }

    pub fn with_objective(mut self, objective: QuestObjective) -> Self {
        self.objectives.push(objective);
        self
    }

    pub fn with_kappa_required(mut self, required: bool) -> Self {
        self.kappa_required = required;
        self
    }
}

/// Minimum trader level a quest requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraderLevelRequirement {
    pub trader_id: TraderId,
    pub level: u32,
}

/// An objective within a quest, optionally counting found items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestObjective {
    pub id: ObjectiveId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub count: Option<u32>,
}

impl QuestObjective {
    pub fn new(id: impl Into<ObjectiveId>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            count: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }
}
