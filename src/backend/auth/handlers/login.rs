/**
 * Login Handler
 *
 * This module implements `POST /account/login`.
 *
 * # Authentication Process
 *
 * 1. Look up the account by username
 * 2. Verify password using bcrypt
 * 3. Refuse inactive accounts
 * 4. Issue an access/refresh pair and record the login time
 *
 * # Security
 *
 * - Unknown username and wrong password give the same 401 after the same
 *   bcrypt work
 * - Passwords are never logged or returned
 */

use axum::{extract::State, response::Json};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::password::{verify_password, verify_without_account};
use crate::backend::auth::users::{get_account_by_username, record_login, Account};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;

/// Check credentials
///
/// Returns the account if the username exists and the password matches,
/// regardless of whether it is active. `bcrypt_cost` is the work spent when
/// the username is unknown.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    bcrypt_cost: u32,
) -> BackendResult<Option<Account>> {
    let Some(account) = get_account_by_username(pool, username).await? else {
        verify_without_account(password, bcrypt_cost)?;
        tracing::warn!("Login attempt for unknown username: {}", username);
        return Ok(None);
    };

    if !verify_password(password, &account.password_hash)? {
        tracing::warn!("Invalid password for user: {}", username);
        return Ok(None);
    }

    Ok(Some(account))
}

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - unknown username or wrong password
/// * `403 Forbidden` - account not activated yet
///
/// # Example Response
///
/// ```json
/// {"refresh": "eyJ...", "access": "eyJ...", "username": "alice"}
/// ```
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> BackendResult<Json<LoginResponse>> {
    tracing::info!("Login request for: {}", request.username);

    let account = authenticate(&state.db, &request.username, &request.password, state.config.bcrypt_cost)
        .await?
        .ok_or_else(|| BackendError::unauthorized("Invalid username or password."))?;

    if !account.is_active {
        tracing::warn!("Login refused for inactive account: {}", account.username);
        return Err(BackendError::forbidden(
            "Account is not activated. Please check your email.",
        ));
    }

    let pair = state.sessions.issue_pair(account.id, &account.username).map_err(|e| {
        tracing::error!("Failed to issue tokens: {}", e);
        BackendError::internal("Failed to issue tokens")
    })?;

    record_login(&state.db, account.id, Utc::now()).await?;

    tracing::info!("User logged in: {}", account.username);

    Ok(Json(LoginResponse {
        refresh: pair.refresh,
        access: pair.access,
        username: account.username,
    }))
}
