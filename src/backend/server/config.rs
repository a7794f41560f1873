/**
 * Server Configuration
 *
 * This module turns an `AppConfig` into live services: the SQLite pool
 * (with migrations applied), the mail transport and the cache store.
 *
 * # Error Handling
 *
 * The database is required: connection and migration failures are
 * returned and abort startup. Mail falls back to the console transport
 * when no SMTP relay is configured.
 */

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

use crate::backend::cache::MemoryCache;
use crate::backend::mail::{ConsoleMailer, MailError, Mailer, SmtpMailer};
use crate::shared::AppConfig;

/// Errors that abort database setup
#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connect to SQLite and run migrations
///
/// Foreign keys are enforced on every connection. In-memory databases are
/// limited to one long-lived connection so every query sees the same data.
///
/// # Example
///
/// ```rust,no_run
/// use scribe::backend::server::config::load_database;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = load_database("sqlite::memory:").await?;
/// # Ok(())
/// # }
/// ```
pub async fn load_database(database_url: &str) -> Result<SqlitePool, DatabaseSetupError> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new().connect_with(options).await?
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}

/// Pick the mail transport
pub fn load_mailer(config: &AppConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match &config.smtp {
        Some(smtp) => {
            tracing::info!("Sending mail through SMTP relay {}:{}", smtp.host, smtp.port);
            Ok(Arc::new(SmtpMailer::new(smtp)?))
        }
        None => {
            tracing::warn!("SMTP_HOST not set. Emails will be logged instead of sent.");
            Ok(Arc::new(ConsoleMailer))
        }
    }
}

/// Create the cache store
pub fn load_cache() -> MemoryCache {
    MemoryCache::new()
}
