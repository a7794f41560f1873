//! Fixtures for unit tests: an in-memory database and an `AppState` wired
//! to the in-memory mailer and cache.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::backend::auth::password::hash_password;
use crate::backend::auth::users::{activate_account, create_account, get_account_by_id, Account};
use crate::backend::cache::MemoryCache;
use crate::backend::mail::MemoryMailer;
use crate::backend::middleware::{AuthUser, AuthenticatedUser};
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .database_url("sqlite::memory:")
        .jwt_secret("test-jwt-secret")
        .secret_key("test-account-secret")
        .public_url("http://testserver")
        .bcrypt_cost(4)
        .build()
        .unwrap()
}

pub async fn test_pool() -> SqlitePool {
    load_database("sqlite::memory:").await.unwrap()
}

pub async fn test_state() -> (AppState, MemoryMailer) {
    test_state_with(test_config()).await
}

pub async fn test_state_with(config: AppConfig) -> (AppState, MemoryMailer) {
    let mailer = MemoryMailer::new();
    let state = AppState::new(
        test_pool().await,
        config,
        Arc::new(mailer.clone()),
        Arc::new(MemoryCache::new()),
    )
    .unwrap();
    (state, mailer)
}

/// Create an activated account with password `pw1`
pub async fn active_account(state: &AppState, username: &str) -> Account {
    let hash = hash_password("pw1", 4).unwrap();
    let account = create_account(&state.db, username, &format!("{username}@x.com"), &hash)
        .await
        .unwrap();
    activate_account(&state.db, account.id).await.unwrap();
    get_account_by_id(&state.db, account.id).await.unwrap().unwrap()
}

pub fn auth_user(account: &Account) -> AuthUser {
    AuthUser(AuthenticatedUser {
        account_id: account.id,
        username: account.username.clone(),
    })
}
