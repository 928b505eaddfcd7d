//! Error types for port operations.

use questline_domain::DomainError;

/// Remote store operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Row not found - includes table and key for actionable error messages.
    #[error("{table} row not found: {id}")]
    NotFound { table: String, id: String },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store cannot be reached right now.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(table: impl ToString, id: impl ToString) -> Self {
        Self::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn unavailable(message: impl ToString) -> Self {
        Self::Unavailable(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors from progress sync and actions that need the remote store.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The action needs a signed-in user.
    #[error("No authenticated user")]
    Unauthenticated,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_error_carries_operation() {
        let err = StoreError::database("upsert", "disk I/O error");
        assert_eq!(err.to_string(), "Database error in upsert: disk I/O error");
        assert!(!err.is_not_found());
    }

    #[test]
    fn store_error_converts_into_sync_error() {
        let err: SyncError = StoreError::unavailable("offline").into();
        assert!(matches!(err, SyncError::Store(StoreError::Unavailable(_))));
        assert_eq!(err.to_string(), "Store unavailable: offline");
    }
}
