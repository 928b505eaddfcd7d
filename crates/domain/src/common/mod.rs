//! Common utility functions shared across the domain.
//!
//! Pure helpers only: no I/O, no async.

pub mod json;
pub mod serde_helpers;
pub mod string;

pub use json::merge_json;
pub use string::{none_if_empty, short_identity, some_if_not_empty};
