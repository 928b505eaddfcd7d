//! Player faction and quest faction restrictions

use std::fmt;

use serde::{Deserialize, Serialize};

/// The faction a player's character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    #[serde(rename = "USEC")]
    Usec,
    #[serde(rename = "BEAR")]
    Bear,

    /// Forward-compatibility fallback for names this build does not know.
    #[serde(other)]
    Unknown,
}

impl Faction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usec => "USEC",
            Self::Bear => "BEAR",
            Self::Unknown => "Unknown",
        }
    }

    /// Names this build does not know map to [`Faction::Unknown`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "USEC" => Self::Usec,
            "BEAR" => Self::Bear,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which factions may take a quest.
///
/// Serialized as the plain faction name, with `"Any"` for unrestricted quests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FactionRestriction {
    #[default]
    Any,
    Only(Faction),
}

impl FactionRestriction {
    /// Whether a member of `faction` may take the quest.
    ///
    /// A restriction naming an unknown faction admits nobody.
    pub fn allows(&self, faction: Faction) -> bool {
        match self {
            Self::Any => true,
            Self::Only(Faction::Unknown) => false,
            Self::Only(required) => *required == faction,
        }
    }
}

impl From<String> for FactionRestriction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Any" | "" => Self::Any,
            other => Self::Only(Faction::from_name(other)),
        }
    }
}

impl From<FactionRestriction> for String {
    fn from(value: FactionRestriction) -> Self {
        match value {
            FactionRestriction::Any => "Any".to_string(),
            FactionRestriction::Only(faction) => faction.as_str().to_string(),
        }
    }
}
