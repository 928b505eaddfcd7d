//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The remote row store (could swap SQLite -> a hosted database)
//! - Authentication (session identity and login state)
//! - Clock (for testing)

mod error;
mod external;
mod testing;

// =============================================================================
// External Collaborator Ports
// =============================================================================
pub use external::{
    AuthPort, AuthSession, RemoteStore, RowFilter, RowSubscription, USER_ID_COLUMN,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockAuthPort, MockRemoteStore};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{StoreError, SyncError};
