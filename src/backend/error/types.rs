/**
 * Backend Error Types
 *
 * This module defines the error taxonomy every HTTP handler speaks.
 * Each variant knows its HTTP status and the message that is safe to show
 * to clients.
 *
 * # Error Categories
 *
 * ## Client Errors
 *
 * - `SharedError` (validation) - malformed or duplicate input, 400
 * - `InvalidToken` - activation/reset token or uid that does not verify, 400
 * - `HandlerError` - any other status chosen by the handler (e.g. 400 on logout)
 * - `Unauthorized` - bad credentials or missing/invalid access token, 401
 * - `Forbidden` - inactive account or ownership mismatch, 403
 * - `NotFound` - unknown id, 404
 *
 * ## Internal Errors
 *
 * Database, password hashing, mail transport and serialization failures all
 * map to 500. Their details are logged, never returned.
 */

use crate::backend::mail::MailError;
use crate::shared::SharedError;
use axum::http::StatusCode;
use thiserror::Error;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use scribe::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::forbidden("You can't modify this blog.");
/// assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error with a status code chosen by the handler
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Bad credentials or missing/invalid access token
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Authenticated but not allowed
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Unknown resource
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Activation or password reset token that does not verify
    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    /// Validation and serialization errors from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    /// Outbound email failure
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Any other internal failure
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Shorthand for a field validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SharedError(SharedError::validation(field, message))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidToken { .. } => StatusCode::BAD_REQUEST,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(_)
            | Self::Password(_)
            | Self::Mail(_)
            | Self::SerializationError(_)
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::InvalidToken { message } => message.clone(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::Mail(_) => "Failed to send email.".to_string(),
            Self::SharedError(SharedError::SerializationError { .. })
            | Self::Database(_)
            | Self::Password(_)
            | Self::SerializationError(_)
            | Self::Internal { .. } => "Internal server error.".to_string(),
        }
    }

    /// Field name for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SharedError(err) => err.field(),
            _ => None,
        }
    }
}
