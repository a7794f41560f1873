/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container, holding:
 * - The SQLite connection pool
 * - The loaded configuration
 * - Session (JWT) keys and the account token generator
 * - The mail transport and the cache store, as trait objects so tests can
 *   swap in `MemoryMailer` / `MemoryCache`
 *
 * # Thread Safety
 *
 * Everything is either internally synchronized (`SqlitePool`) or wrapped in
 * `Arc`, so cloning the state per request is cheap.
 *
 * # Example
 *
 * ```rust,no_run
 * use scribe::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let page_size = state.config.page_size;
 *     // ...
 * }
 * ```
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::auth::tokens::{AccountTokenError, AccountTokenGenerator};
use crate::backend::cache::CacheStore;
use crate::backend::mail::Mailer;
use crate::shared::AppConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// Access/refresh token signing keys
    pub sessions: Arc<SessionKeys>,

    /// Activation and password reset token signer
    pub account_tokens: Arc<AccountTokenGenerator>,

    /// Outbound mail transport
    pub mailer: Arc<dyn Mailer>,

    /// Profile cache
    pub cache: Arc<dyn CacheStore>,
}

impl AppState {
    /// Assemble the state from its collaborators
    ///
    /// Signing keys are derived from the secrets in `config`.
    pub fn new(
        db: SqlitePool,
        config: AppConfig,
        mailer: Arc<dyn Mailer>,
        cache: Arc<dyn CacheStore>,
    ) -> Result<Self, AccountTokenError> {
        let sessions = SessionKeys::new(&config.jwt_secret, config.access_token_ttl, config.refresh_token_ttl);
        let account_tokens = AccountTokenGenerator::new(config.secret_key.as_bytes(), config.account_token_ttl)?;

        Ok(Self {
            db,
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            account_tokens: Arc::new(account_tokens),
            mailer,
            cache,
        })
    }
}

/// Implement FromRef for SqlitePool
///
/// This allows handlers that only touch the database to extract
/// `State(pool): State<SqlitePool>` directly.
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}
