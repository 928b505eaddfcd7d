//! Game mode value object - selects which progress partition is active

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the two isolated progress partitions.
///
/// `Pvp` is the competitive mode and the default for new and legacy records;
/// `Pve` is the cooperative mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Pvp,
    Pve,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Pvp, GameMode::Pve];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pvp => "pvp",
            Self::Pve => "pve",
        }
    }

    /// Game mode name used by the definitions API.
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Pvp => "regular",
            Self::Pve => "pve",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::Pvp => Self::Pve,
            Self::Pve => Self::Pvp,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pvp" => Ok(Self::Pvp),
            "pve" => Ok(Self::Pve),
            _ => Err(DomainError::parse(format!("Unknown game mode: {}", s))),
        }
    }
}
