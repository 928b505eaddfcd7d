//! Domain Events
//!
//! Return types from progress mutations, communicating what changed so the
//! engine can react (schedule a push, skip echoes of remote patches).

pub mod progress_events;

pub use progress_events::*;
