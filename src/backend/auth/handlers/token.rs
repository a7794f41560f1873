/**
 * Token Endpoints
 *
 * - `POST /account/token` exchanges credentials for a token pair
 * - `POST /account/token/refresh` exchanges a refresh token for a new
 *   access token
 *
 * Both answer 401 for anything they refuse.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::blacklist::is_blacklisted;
use crate::backend::auth::handlers::login::authenticate;
use crate::backend::auth::handlers::types::{AccessResponse, LoginRequest, RefreshRequest, TokenPairResponse};
use crate::backend::auth::sessions::TokenType;
use crate::backend::auth::users::get_account_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;

/// Obtain a token pair
pub async fn obtain_token_pair(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> BackendResult<Json<TokenPairResponse>> {
    let account = authenticate(&state.db, &request.username, &request.password, state.config.bcrypt_cost)
        .await?
        .filter(|account| account.is_active)
        .ok_or_else(|| BackendError::unauthorized("No active account found with the given credentials"))?;

    let pair = state
        .sessions
        .issue_pair(account.id, &account.username)
        .map_err(|e| {
            tracing::error!("Failed to issue tokens: {}", e);
            BackendError::internal("Failed to issue tokens")
        })?;

    Ok(Json(TokenPairResponse {
        refresh: pair.refresh,
        access: pair.access,
    }))
}

/// Refresh an access token
///
/// # Errors
///
/// * `400 Bad Request` - no refresh token in the body
/// * `401 Unauthorized` - invalid, expired or blacklisted token, or the
///   account is gone or inactive
pub async fn refresh_access_token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> BackendResult<Json<AccessResponse>> {
    let refresh = request
        .refresh
        .filter(|token| !token.is_empty())
        .ok_or_else(|| BackendError::validation("refresh", "This field is required."))?;

    let claims = state.sessions.verify(&refresh, TokenType::Refresh).map_err(|e| {
        tracing::debug!("Refresh rejected: {}", e);
        BackendError::unauthorized("Token is invalid or expired")
    })?;

    if is_blacklisted(&state.db, &claims.jti).await? {
        return Err(BackendError::unauthorized("Token is blacklisted"));
    }

    let account = match claims.account_id() {
        Some(id) => get_account_by_id(&state.db, id).await?,
        None => None,
    };
    if !account.is_some_and(|account| account.is_active) {
        return Err(BackendError::unauthorized("User not found or inactive"));
    }

    let access = state.sessions.access_from_refresh(&claims).map_err(|e| {
        tracing::error!("Failed to issue access token: {}", e);
        BackendError::internal("Failed to issue tokens")
    })?;

    Ok(Json(AccessResponse { access }))
}
