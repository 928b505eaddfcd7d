//! Value objects - Immutable objects defined by their attributes

mod completion;
mod edition;
mod faction;
mod game_mode;
mod progress_category;

pub use completion::{Completion, ObjectiveProgress, QuestStatus};
pub use edition::{
    edition_title, GameEdition, DEFAULT_GAME_EDITION, GAME_EDITIONS, RITUAL_EDITIONS,
};
pub use faction::{Faction, FactionRestriction};
pub use game_mode::GameMode;
pub use progress_category::ProgressCategory;
