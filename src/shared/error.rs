//! Shared Error Types
//!
//! This module defines error types that are independent of the HTTP layer.
//! They describe bad input and payload encoding failures, and are wrapped by
//! `backend::error::BackendError` when they cross a handler boundary.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Data validation failures, tagged with the offending field
//!
//! # Usage
//!
//! ```rust
//! use scribe::shared::error::SharedError;
//!
//! let error = SharedError::validation("username", "A user with that username already exists.");
//! ```
use thiserror::Error;

/// Shared error types for input validation and serialization
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the field that failed validation, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::SerializationError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error() {
        let error = SharedError::serialization("Invalid JSON");
        match error {
            SharedError::SerializationError { message } => {
                assert_eq!(message, "Invalid JSON");
            }
            _ => panic!("Expected SerializationError"),
        }
    }

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("email", "Enter a valid email address.");
        match &error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "email");
                assert_eq!(message, "Enter a valid email address.");
            }
            _ => panic!("Expected ValidationError"),
        }
        assert_eq!(error.field(), Some("email"));
    }

    #[test]
    fn test_error_display() {
        let error = SharedError::validation("title", "This field may not be blank.");
        let display = format!("{}", error);
        assert!(display.contains("title"));
        assert!(display.contains("may not be blank"));
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let shared_error: SharedError = result.unwrap_err().into();

        assert!(matches!(shared_error, SharedError::SerializationError { .. }));
        assert_eq!(shared_error.field(), None);
    }
}
