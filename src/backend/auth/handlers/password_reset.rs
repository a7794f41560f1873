/**
 * Password Reset Handlers
 *
 * - `POST /account/password-reset` emails a reset link
 * - `POST /account/password-reset-confirm/{uid}/{token}` sets the new
 *   password
 *
 * The request step answers the same way whether or not the email belongs
 * to an account, so it cannot be used to probe for registered addresses.
 * The reset token is bound to the current password hash, so a link works
 * only until the password changes.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::emails::password_reset_email;
use crate::backend::auth::handlers::types::{MessageResponse, PasswordResetConfirmRequest, PasswordResetRequest};
use crate::backend::auth::password::hash_password;
use crate::backend::auth::tokens::{decode_uid, encode_uid, TokenPurpose};
use crate::backend::auth::users::{get_account_by_email, get_account_by_id, set_password_hash};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiJson, ApiPath};
use crate::backend::server::state::AppState;
use crate::shared::validation::validate_email;

const INVALID_RESET: &str = "Invalid token or user.";

/// Request a password reset link
pub async fn request_password_reset(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PasswordResetRequest>,
) -> BackendResult<Json<MessageResponse>> {
    validate_email(&request.email)?;

    match get_account_by_email(&state.db, &request.email).await? {
        Some(account) => {
            let uid = encode_uid(account.id);
            let token = state.account_tokens.make_token(TokenPurpose::PasswordReset, &account);
            state
                .mailer
                .send(password_reset_email(&state.config, &account.email, &uid, &token))
                .await?;
            tracing::info!("Password reset link sent to account {}", account.id);
        }
        None => {
            tracing::debug!("Password reset requested for unknown email");
        }
    }

    Ok(Json(MessageResponse::new("Password reset link sent to email.")))
}

/// Set a new password from a reset link
///
/// # Errors
///
/// * `400 Bad Request` - blank password, or uid/token that does not verify
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    ApiPath((uid, token)): ApiPath<(String, String)>,
    ApiJson(request): ApiJson<PasswordResetConfirmRequest>,
) -> BackendResult<Json<MessageResponse>> {
    if request.new_password.is_empty() {
        return Err(BackendError::validation("new_password", "This field may not be blank."));
    }

    let id = decode_uid(&uid).map_err(|_| BackendError::invalid_token(INVALID_RESET))?;
    let account = get_account_by_id(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::invalid_token(INVALID_RESET))?;

    if !state
        .account_tokens
        .check_token(TokenPurpose::PasswordReset, &account, &token)
    {
        tracing::warn!("Rejected password reset token for account {}", account.id);
        return Err(BackendError::invalid_token(INVALID_RESET));
    }

    let password_hash = hash_password(&request.new_password, state.config.bcrypt_cost)?;
    set_password_hash(&state.db, account.id, &password_hash).await?;

    tracing::info!("Password reset for account {}", account.id);
    Ok(Json(MessageResponse::new("Password reset successful")))
}
