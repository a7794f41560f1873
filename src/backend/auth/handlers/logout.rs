/**
 * Logout Handler
 *
 * `POST /account/logout` revokes the caller's refresh token by adding its
 * `jti` to the blacklist. The access token simply runs out.
 *
 * Any problem with the supplied token (bad signature, expired, wrong type,
 * issued to someone else, already revoked) is reported with one generic
 * 400 message.
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::blacklist::blacklist_token;
use crate::backend::auth::handlers::types::{MessageResponse, RefreshRequest};
use crate::backend::auth::sessions::TokenType;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::server::state::AppState;

const LOGOUT_FAILED: &str = "Something went wrong during logout.";

/// Logout handler
///
/// # Errors
///
/// * `401 Unauthorized` - no valid access token
/// * `400 Bad Request` - refresh token missing or unusable
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> BackendResult<Json<MessageResponse>> {
    let refresh = request
        .refresh
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| BackendError::handler(StatusCode::BAD_REQUEST, "Refresh token is required."))?;

    let claims = state.sessions.verify(&refresh, TokenType::Refresh).map_err(|e| {
        tracing::warn!("Logout with unusable refresh token from {}: {}", user.username, e);
        BackendError::handler(StatusCode::BAD_REQUEST, LOGOUT_FAILED)
    })?;

    if claims.account_id() != Some(user.account_id) {
        tracing::warn!("User {} tried to revoke another account's token", user.username);
        return Err(BackendError::handler(StatusCode::BAD_REQUEST, LOGOUT_FAILED));
    }

    if !blacklist_token(&state.db, &claims, user.account_id).await? {
        return Err(BackendError::handler(StatusCode::BAD_REQUEST, LOGOUT_FAILED));
    }

    tracing::info!("User logged out: {}", user.username);
    Ok(Json(MessageResponse::new("Successfully logged out.")))
}
