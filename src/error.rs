//! Custom error types for Tally
//!
//! This module defines the error hierarchy for the ledger using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Tally operations
#[derive(Error, Debug)]
pub enum TallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A file could not be opened, read or written
    #[error("I/O error: {0}")]
    Io(String),

    /// A position outside the current list bounds
    #[error("Invalid index {index}: list holds {len} records")]
    Index { index: usize, len: usize },

    /// Malformed date text reaching date-key derivation
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A persisted file exists but cannot be decoded
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Unknown username or wrong password; the two cases are not distinguished
    #[error("Sign in failed")]
    AuthenticationFailed,

    /// Audit log errors
    #[error("Audit error: {0}")]
    Audit(String),
}

impl TallyError {
    /// Create an index error for a list of the given length
    pub fn index(index: usize, len: usize) -> Self {
        Self::Index { index, len }
    }

    /// Create a "duplicate" error for users
    pub fn duplicate_user(identifier: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is an index error
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index { .. })
    }

    /// Check if this is a date format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Check if this is an I/O error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for TallyError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            Self::Io(err.to_string())
        } else {
            Self::Storage(err.to_string())
        }
    }
}

/// Result type alias for Tally operations
pub type TallyResult<T> = Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TallyError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_index_error() {
        let err = TallyError::index(3, 2);
        assert_eq!(err.to_string(), "Invalid index 3: list holds 2 records");
        assert!(err.is_index());
        assert!(!err.is_format());
    }

    #[test]
    fn test_duplicate_user_error() {
        let err = TallyError::duplicate_user("alice");
        assert_eq!(err.to_string(), "User already exists: alice");
    }

    #[test]
    fn test_authentication_failed_message_is_generic() {
        assert_eq!(TallyError::AuthenticationFailed.to_string(), "Sign in failed");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let tally_err: TallyError = io_err.into();
        assert!(tally_err.is_io());
    }
}
