//! Domain entities - Read-only definitions the resolver evaluates against

mod catalog;
mod quest;
mod station;
mod trader;

pub use catalog::Catalog;
pub use quest::{Quest, QuestObjective, TraderLevelRequirement};
pub use station::{ItemRequirement, Station, StationLevel, RITUAL_STATION_ID, STASH_STATION_ID};
pub use trader::Trader;
