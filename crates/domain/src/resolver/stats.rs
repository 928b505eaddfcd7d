//! Dashboard statistics for the local member

use serde::Serialize;

use crate::aggregates::UserProgress;
use crate::entities::Catalog;

use super::quests::is_quest_available;

/// `completed / total * 100`, or 0 when there is nothing to count.
pub fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// Counters shown on the dashboard.
///
/// Totals only include quests the member's faction can take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub available_tasks: usize,
    pub failed_tasks: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_kappa_tasks: usize,
    pub completed_kappa_tasks: usize,
    pub total_objectives: usize,
    pub completed_objectives: usize,
}

impl DashboardStats {
    pub fn compute(catalog: &Catalog, progress: &UserProgress) -> Self {
        let data = progress.current();
        let faction = data.pmc_faction();
        let mut stats = Self::default();

        for quest in &catalog.quests {
            let complete = data.is_quest_complete(quest.id.as_str());
            if is_quest_available(quest, data) {
                stats.available_tasks += 1;
            }
            if data.is_quest_failed(quest.id.as_str()) {
                stats.failed_tasks += 1;
            }
            if complete {
                stats.completed_tasks += 1;
            }

            if !quest.faction_name.allows(faction) {
                continue;
            }
            stats.total_tasks += 1;
            if quest.kappa_required {
                stats.total_kappa_tasks += 1;
                if complete {
                    stats.completed_kappa_tasks += 1;
                }
            }
            stats.total_objectives += quest.objectives.len();
            stats.completed_objectives += quest
                .objectives
                .iter()
                .filter(|objective| data.is_objective_complete(objective.id.as_str()))
                .count();
        }

        stats
    }

    pub fn task_percentage(&self) -> f64 {
        percentage(self.completed_tasks, self.total_tasks)
    }

    pub fn kappa_percentage(&self) -> f64 {
        percentage(self.completed_kappa_tasks, self.total_kappa_tasks)
    }
}
