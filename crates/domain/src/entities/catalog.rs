//! Catalog - the full set of definitions the resolver evaluates against
//!
//! An empty catalog is valid: it stands for "definitions not fetched yet"
//! and every derived map over it is empty.

use serde::{Deserialize, Serialize};

use questline_domain::{ItemRequirementId, ModuleId, ObjectiveId, QuestId};

use super::{Quest, QuestObjective, Station, Trader};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub traders: Vec<Trader>,
}

impl Catalog {
    pub fn new(quests: Vec<Quest>, stations: Vec<Station>, traders: Vec<Trader>) -> Self {
        Self {
            quests,
            stations,
            traders,
        }
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|quest| quest.id.as_str() == id)
    }

    /// Every objective paired with the quest that owns it.
    pub fn objectives(&self) -> impl Iterator<Item = (&Quest, &QuestObjective)> + '_ {
        self.quests
            .iter()
            .flat_map(|quest| quest.objectives.iter().map(move |objective| (quest, objective)))
    }

    pub fn objective_ids(&self) -> impl Iterator<Item = &ObjectiveId> + '_ {
        self.objectives().map(|(_, objective)| &objective.id)
    }

    pub fn module_ids(&self) -> impl Iterator<Item = &ModuleId> + '_ {
        self.stations
            .iter()
            .flat_map(|station| station.levels.iter().map(|level| &level.id))
    }

    pub fn item_requirement_ids(&self) -> impl Iterator<Item = &ItemRequirementId> + '_ {
        self.stations.iter().flat_map(|station| {
            station
                .levels
                .iter()
                .flat_map(|level| level.item_requirements.iter().map(|req| &req.id))
        })
    }

    pub fn quest_ids(&self) -> impl Iterator<Item = &QuestId> + '_ {
        self.quests.iter().map(|quest| &quest.id)
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty() && self.stations.is_empty() && self.traders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ItemRequirement, StationLevel};

    #[test]
    fn flattens_nested_ids() {
        let catalog = Catalog::new(
            vec![Quest::new("q1", "Debut")
                .with_objective(QuestObjective::new("o1"))
                .with_objective(QuestObjective::new("o2"))],
            vec![Station::new("s1", "Workbench").with_level(
                StationLevel::new("m1", 1).with_requirement(ItemRequirement::new("r1", "bolts", 2)),
            )],
            Vec::new(),
        );

        assert_eq!(catalog.objective_ids().count(), 2);
        assert_eq!(catalog.module_ids().map(|id| id.as_str()).collect::<Vec<_>>(), vec!["m1"]);
        assert_eq!(catalog.item_requirement_ids().count(), 1);
        assert!(catalog.quest("q1").is_some());
        assert!(catalog.quest("missing").is_none());
    }

    #[test]
    fn default_catalog_is_empty() {
        assert!(Catalog::default().is_empty());
    }
}
