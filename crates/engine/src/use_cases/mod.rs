//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area.
//! Use cases orchestrate across stores and ports to fulfill user stories.

pub mod progress;
pub mod sync;

// Re-export main types
pub use progress::ProgressUseCases;
pub use sync::SyncUseCases;
