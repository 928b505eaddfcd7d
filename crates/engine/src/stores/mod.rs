//! In-memory state storage modules.
//!
//! Stores own the runtime state the use cases work over:
//! - `LocalProgressStore` - the local user's progress record and change stream
//! - `TeamStore` - mirrored teammate records and hidden-member preferences
//! - `CatalogStore` - quest and station definitions

pub mod catalog;
pub mod local_progress;
pub mod team;

// Re-export store types
pub use catalog::CatalogStore;
pub use local_progress::LocalProgressStore;
pub use team::{TeamStore, TeammateState};
