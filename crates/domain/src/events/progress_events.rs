//! Progress-record change events

use crate::ids::{ItemRequirementId, ModuleId, ObjectiveId, QuestId, TraderId};
use crate::value_objects::{Faction, GameMode, QuestStatus};

/// Which partitions a reset cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    AllModes,
    Mode(GameMode),
}

/// What a mutation of a progress record changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressChange {
    QuestStatusChanged {
        mode: GameMode,
        quest_id: QuestId,
        from: QuestStatus,
        to: QuestStatus,
    },
    ObjectiveChanged {
        mode: GameMode,
        objective_id: ObjectiveId,
        complete: bool,
    },
    ObjectiveCountChanged {
        mode: GameMode,
        objective_id: ObjectiveId,
        count: u32,
    },
    ModuleChanged {
        mode: GameMode,
        module_id: ModuleId,
        complete: bool,
    },
    PartChanged {
        mode: GameMode,
        requirement_id: ItemRequirementId,
        complete: bool,
    },
    LevelChanged {
        mode: GameMode,
        from: u32,
        to: u32,
    },
    FactionChanged {
        mode: GameMode,
        from: Faction,
        to: Faction,
    },
    DisplayNameChanged {
        mode: GameMode,
        to: Option<String>,
    },
    TraderLevelChanged {
        mode: GameMode,
        trader_id: TraderId,
        level: u32,
    },
    GameEditionChanged {
        from: u32,
        to: u32,
    },
    GameModeSwitched {
        from: GameMode,
        to: GameMode,
    },
    Reset {
        scope: ResetScope,
    },
    /// A legacy document was upgraded to the dual-partition shape
    Migrated,
    /// Remote state was merged in; not a local edit
    RemotePatched,
}

impl ProgressChange {
    /// Whether this change originated locally and should be pushed.
    pub fn is_local_edit(&self) -> bool {
        !matches!(self, Self::RemotePatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_patch_is_not_a_local_edit() {
        assert!(!ProgressChange::RemotePatched.is_local_edit());
        assert!(ProgressChange::Migrated.is_local_edit());
        assert!(ProgressChange::Reset {
            scope: ResetScope::AllModes
        }
        .is_local_edit());
    }
}
