//! Questline Engine library.
//!
//! Runtime around the questline domain: stores, sync with the remote row
//! store, and the queries and actions a client drives.
//!
//! ## Structure
//!
//! - `stores/` - Runtime state (local record, teammate mirrors, definitions)
//! - `use_cases/` - Progress queries/actions and sync orchestration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
