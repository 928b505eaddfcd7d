//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod auth;
pub mod clock;
pub mod config;
pub mod memory_store;
pub mod ports;
pub mod rows;
pub mod sqlite_store;
pub mod subscriptions;
