//! Aggregate roots - domain objects that own their related data
//!
//! Mutations return [`crate::events::ProgressChange`] values describing what
//! changed, rather than publishing events themselves.

pub mod progress;
pub mod team;

pub use progress::{ProgressData, UserProgress};
pub use team::{Team, TeamView};
