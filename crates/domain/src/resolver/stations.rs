//! Hideout station levels
//!
//! Ordinary stations display the highest built level. The stash starts at a
//! level granted by the purchased edition, and the ritual station is fully
//! granted by the two top editions.

use crate::aggregates::{ProgressData, TeamView, UserProgress};
use crate::entities::{Catalog, Station, StationLevel};
use crate::ids::{ItemRequirementId, ModuleId, StationId};
use crate::value_objects::GameEdition;

use super::EntityMemberMap;

/// Display rule a station follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationRule {
    Standard,
    Stash,
    Ritual,
}

impl StationRule {
    pub fn for_station(station: &Station) -> Self {
        if station.is_stash() {
            Self::Stash
        } else if station.is_ritual() {
            Self::Ritual
        } else {
            Self::Standard
        }
    }
}

/// A level counts as built when its module is marked complete, or when it
/// has item requirements and every one of them is marked complete.
pub fn is_level_built(level: &StationLevel, data: &ProgressData) -> bool {
    if data.is_module_complete(level.id.as_str()) {
        return true;
    }
    !level.item_requirements.is_empty()
        && level
            .item_requirements
            .iter()
            .all(|requirement| data.is_part_complete(requirement.id.as_str()))
}

/// Highest built level of a station, 0 when nothing is built.
pub fn highest_built_level(station: &Station, data: &ProgressData) -> u32 {
    station
        .levels
        .iter()
        .filter(|level| is_level_built(level, data))
        .map(|level| level.level)
        .max()
        .unwrap_or(0)
}

/// Stash level shown for an edition default, the station maximum, and the
/// highest manually built level.
///
/// The edition default is capped at the maximum. A capped default equal to
/// the maximum is shown outright; otherwise manual building can only raise
/// the level above the default.
pub fn stash_display_level(edition_default: u32, max_level: u32, manual_level: u32) -> u32 {
    let effective = edition_default.min(max_level);
    if effective == max_level {
        max_level
    } else {
        effective.max(manual_level)
    }
}

/// Level shown for a station given one member's record.
pub fn displayed_station_level(station: &Station, progress: &UserProgress) -> u32 {
    let manual = highest_built_level(station, progress.current());
    let edition = progress.game_edition();
    match StationRule::for_station(station) {
        StationRule::Standard => manual,
        StationRule::Stash => stash_display_level(
            GameEdition::default_stash_level_for(edition),
            station.max_level(),
            manual,
        ),
        StationRule::Ritual => {
            if GameEdition::grants_ritual_station(edition) && station.max_level() > 0 {
                station.max_level()
            } else {
                manual
            }
        }
    }
}

pub fn hideout_levels(catalog: &Catalog, view: &TeamView<'_>) -> EntityMemberMap<StationId, u32> {
    catalog
        .stations
        .iter()
        .map(|station| {
            let members = view
                .iter()
                .map(|(key, progress)| (key.clone(), displayed_station_level(station, progress)))
                .collect();
            (station.id.clone(), members)
        })
        .collect()
}

pub fn module_completions(
    catalog: &Catalog,
    view: &TeamView<'_>,
) -> EntityMemberMap<ModuleId, bool> {
    catalog
        .module_ids()
        .map(|module_id| {
            let members = view
                .iter()
                .map(|(key, progress)| {
                    (
                        key.clone(),
                        progress.current().is_module_complete(module_id.as_str()),
                    )
                })
                .collect();
            (module_id.clone(), members)
        })
        .collect()
}

pub fn module_part_completions(
    catalog: &Catalog,
    view: &TeamView<'_>,
) -> EntityMemberMap<ItemRequirementId, bool> {
    catalog
        .item_requirement_ids()
        .map(|requirement_id| {
            let members = view
                .iter()
                .map(|(key, progress)| {
                    (
                        key.clone(),
                        progress.current().is_part_complete(requirement_id.as_str()),
                    )
                })
                .collect();
            (requirement_id.clone(), members)
        })
        .collect()
}
