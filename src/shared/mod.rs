//! Shared Module
//!
//! Types that do not depend on the HTTP layer: input validation, its
//! errors, and the application configuration.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Field validation helpers
pub mod validation;

pub use config::{AppConfig, AppConfigBuilder, ConfigError, SmtpConfig};
pub use error::SharedError;
