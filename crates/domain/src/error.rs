//! Unified error types for the domain layer
//!
//! Resolver functions never fail; these errors only surface from parsing
//! external documents (progress records, definition payloads, category names).

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A stored progress document could not be brought to the current schema
    #[error("Migration failed: {0}")]
    Migration(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for ProgressCategory {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "tasks" => Ok(Self::Tasks),
    ///             _ => Err(DomainError::parse(format!("Unknown progress category: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a migration error
    pub fn migration(msg: impl Into<String>) -> Self {
        Self::Migration(msg.into())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("level must be positive");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: level must be positive");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Quest", "5936d90786f7742b1420ba5b");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Quest"));
        assert!(err.to_string().contains("5936d907"));
    }

    #[test]
    fn test_migration_error() {
        let err = DomainError::migration("pvp partition is not an object");
        assert_eq!(
            err.to_string(),
            "Migration failed: pvp partition is not an object"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let domain_err: DomainError = serde_err.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
    }
}
