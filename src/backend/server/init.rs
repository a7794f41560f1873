/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including configuration loading, service creation and route configuration.
 *
 * # Initialization Process
 *
 * 1. Load `AppConfig` from the environment
 * 2. Connect to the database and run migrations
 * 3. Pick the mail transport and create the cache store
 * 4. Assemble `AppState` (derives the signing keys)
 * 5. Start the hourly maintenance task
 * 6. Create and configure the router
 *
 * Any failure before the router exists aborts startup.
 */

use axum::Router;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::backend::auth::blacklist::purge_expired;
use crate::backend::auth::tokens::AccountTokenError;
use crate::backend::cache::MemoryCache;
use crate::backend::mail::MailError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_cache, load_database, load_mailer, DatabaseSetupError};
use crate::backend::server::state::AppState;
use crate::shared::{AppConfig, ConfigError};

const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Errors that prevent the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseSetupError),

    #[error("mail setup error: {0}")]
    Mail(#[from] MailError),

    #[error("account token setup error: {0}")]
    AccountTokens(#[from] AccountTokenError),
}

/// Create the application from environment configuration
pub async fn create_app() -> Result<Router<()>, StartupError> {
    create_app_with(AppConfig::from_env()?).await
}

/// Create the application from an explicit configuration
///
/// # Errors
///
/// Database connection or migration failures, an unusable SMTP relay
/// configuration, or an unusable account token secret.
pub async fn create_app_with(config: AppConfig) -> Result<Router<()>, StartupError> {
    tracing::info!("Initializing scribe backend server");

    let db = load_database(&config.database_url).await?;
    let mailer = load_mailer(&config)?;
    let cache = load_cache();

    let app_state = AppState::new(db.clone(), config, mailer, Arc::new(cache.clone()))?;

    spawn_maintenance(db, cache);

    let app = create_router(app_state);
    tracing::info!("Router configured with hourly maintenance task");

    Ok(app)
}

/// Periodically drop expired blacklist rows and cache entries
fn spawn_maintenance(db: SqlitePool, cache: MemoryCache) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(MAINTENANCE_INTERVAL);
        loop {
            interval.tick().await;
            run_maintenance(&db, &cache).await;
        }
    });
}

async fn run_maintenance(db: &SqlitePool, cache: &MemoryCache) {
    match purge_expired(db, Utc::now().timestamp()).await {
        Ok(0) => {}
        Ok(purged) => tracing::info!("Purged {} expired blacklist entries", purged),
        Err(e) => tracing::error!("Failed to purge token blacklist: {}", e),
    }
    cache.purge_expired();
    tracing::debug!("Maintenance pass finished");
}
