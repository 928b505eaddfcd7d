//! Hideout stations and their upgrade modules

use serde::{Deserialize, Serialize};

use questline_domain::{ItemRequirementId, ModuleId, StationId};

/// Station whose level is granted by the purchased edition.
pub const STASH_STATION_ID: &str = "5d484fc0654e76006657e0ab";
/// Station the two top editions unlock at its maximum level.
pub const RITUAL_STATION_ID: &str = "667298e75ea6b4493c08f266";

/// A hideout station with its ordered upgrade levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: StationId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub levels: Vec<StationLevel>,
}

impl Station {
    pub fn new(id: impl Into<StationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            levels: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: StationLevel) -> Self {
        self.levels.push(level);
        self
    }

    /// Highest level the station defines.
    pub fn max_level(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    pub fn is_stash(&self) -> bool {
        self.id.as_str() == STASH_STATION_ID
    }

    pub fn is_ritual(&self) -> bool {
        self.id.as_str() == RITUAL_STATION_ID
    }
}

/// One upgrade module of a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationLevel {
    pub id: ModuleId,
    pub level: u32,
    #[serde(default)]
    pub item_requirements: Vec<ItemRequirement>,
}

impl StationLevel {
    pub fn new(id: impl Into<ModuleId>, level: u32) -> Self {
        Self {
            id: id.into(),
            level,
            item_requirements: Vec::new(),
        }
    }

    pub fn with_requirement(mut self, requirement: ItemRequirement) -> Self {
        self.item_requirements.push(requirement);
        self
    }
}

/// Items a module needs before it can be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequirement {
    pub id: ItemRequirementId,
    #[serde(default)]
    pub item_id: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

impl ItemRequirement {
    pub fn new(id: impl Into<ItemRequirementId>, item_id: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            item_id: item_id.into(),
            count,
        }
    }
}
