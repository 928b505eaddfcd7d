//! Purchased game editions and the perks they grant

/// A purchasable game edition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameEdition {
    pub version: u32,
    pub title: &'static str,
    /// Starting trader reputation bonus
    pub trader_rep_bonus: f32,
    /// Stash level granted on purchase
    pub default_stash_level: u32,
}

/// Every known edition, ordered by tier.
pub const GAME_EDITIONS: [GameEdition; 6] = [
    GameEdition {
        version: 1,
        title: "Standard Edition",
        trader_rep_bonus: 0.0,
        default_stash_level: 1,
    },
    GameEdition {
        version: 2,
        title: "Left Behind Edition",
        trader_rep_bonus: 0.0,
        default_stash_level: 2,
    },
    GameEdition {
        version: 3,
        title: "Prepare for Escape Edition",
        trader_rep_bonus: 0.2,
        default_stash_level: 3,
    },
    GameEdition {
        version: 4,
        title: "Edge of Darkness (Limited Edition)",
        trader_rep_bonus: 0.2,
        default_stash_level: 4,
    },
    GameEdition {
        version: 5,
        title: "Unheard Edition",
        trader_rep_bonus: 0.2,
        default_stash_level: 5,
    },
    GameEdition {
        version: 6,
        title: "Unheard + Edge Of Darkness (EOD) Edition",
        trader_rep_bonus: 0.2,
        default_stash_level: 5,
    },
];

/// Editions that grant the ritual station at its maximum level.
pub const RITUAL_EDITIONS: [u32; 2] = [5, 6];

/// Edition assigned to records that never stored one.
pub const DEFAULT_GAME_EDITION: u32 = 1;

impl GameEdition {
    pub fn find(version: u32) -> Option<&'static GameEdition> {
        GAME_EDITIONS.iter().find(|edition| edition.version == version)
    }

    /// Default stash level for an edition version, 0 when the version is unknown.
    pub fn default_stash_level_for(version: u32) -> u32 {
        Self::find(version).map_or(0, |edition| edition.default_stash_level)
    }

    pub fn grants_ritual_station(version: u32) -> bool {
        RITUAL_EDITIONS.contains(&version)
    }
}

/// Human-readable edition name for display.
pub fn edition_title(version: Option<u32>) -> String {
    match version {
        None | Some(0) => "N/A".to_string(),
        Some(version) => GameEdition::find(version)
            .map(|edition| edition.title.to_string())
            .unwrap_or_else(|| format!("Edition {}", version)),
    }
}
