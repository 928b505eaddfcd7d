//! Questline domain: quest and hideout definitions, per-user progress
//! records, schema migration, team aggregation, and availability resolution.
//!
//! Everything here is synchronous and free of I/O.

extern crate self as questline_domain;

pub mod aggregates;
pub mod common;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod migration;
pub mod resolver;
pub mod value_objects;

pub use aggregates::{ProgressData, Team, TeamView, UserProgress};
pub use entities::{
    Catalog, ItemRequirement, Quest, QuestObjective, Station, StationLevel, Trader,
    TraderLevelRequirement, RITUAL_STATION_ID, STASH_STATION_ID,
};
pub use error::DomainError;
pub use events::{ProgressChange, ResetScope};
pub use ids::{
    ItemRequirementId, MemberKey, ModuleId, ObjectiveId, QuestId, StationId, TraderId,
    SELF_MEMBER_KEY,
};
pub use migration::{migrate, needs_migration, MigrationGuard, Settlement, StoredProgress};
pub use resolver::{DashboardStats, ProgressSnapshot, QuestBlocker};
pub use value_objects::{
    edition_title, Completion, Faction, FactionRestriction, GameEdition, GameMode,
    ObjectiveProgress, ProgressCategory, QuestStatus,
};
