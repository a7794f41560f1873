/**
 * Registration Handlers
 *
 * This module implements account registration and activation:
 *
 * - `POST /account/register` creates an inactive account and emails an
 *   activation link
 * - `GET /account/register/activate/{uid}/{token}` redeems that link
 *
 * # Registration Process
 *
 * 1. Validate username, email and password
 * 2. Reject duplicates (the unique constraints back this up under races)
 * 3. Hash password using bcrypt
 * 4. Create the inactive account
 * 5. Send the activation email; if sending fails the account is removed
 *    again and the request fails, so no account exists without a link
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::emails::activation_email;
use crate::backend::auth::handlers::types::{MessageResponse, RegisterRequest};
use crate::backend::auth::handlers::user::user_cache_key;
use crate::backend::auth::password::hash_password;
use crate::backend::auth::tokens::{decode_uid, encode_uid, TokenPurpose};
use crate::backend::auth::users::{
    activate_account, conflicting_field, create_account, delete_account, get_account_by_email,
    get_account_by_id, get_account_by_username,
};
use crate::backend::cache::cache_delete;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiJson, ApiPath};
use crate::backend::server::state::AppState;
use crate::shared::validation::{validate_email, validate_username};

const USERNAME_TAKEN: &str = "A user with that username already exists.";
const EMAIL_TAKEN: &str = "A user with that email already exists.";

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid or duplicate username/email, blank password
/// * `500 Internal Server Error` - hashing, database or mail failure
///
/// # Example Request
///
/// ```http
/// POST /account/register HTTP/1.1
/// Content-Type: application/json
///
/// {"username": "alice", "email": "a@x.com", "password": "pw1"}
/// ```
///
/// # Example Response
///
/// ```json
/// {"message": "User registered. Activation email sent."}
/// ```
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> BackendResult<(StatusCode, Json<MessageResponse>)> {
    tracing::info!("Registration request for username: {}", request.username);

    validate_username(&request.username)?;
    validate_email(&request.email)?;
    if request.password.is_empty() {
        return Err(BackendError::validation("password", "This field may not be blank."));
    }

    if get_account_by_username(&state.db, &request.username).await?.is_some() {
        tracing::warn!("Username already exists: {}", request.username);
        return Err(BackendError::validation("username", USERNAME_TAKEN));
    }
    if get_account_by_email(&state.db, &request.email).await?.is_some() {
        tracing::warn!("Email already exists: {}", request.email);
        return Err(BackendError::validation("email", EMAIL_TAKEN));
    }

    let password_hash = hash_password(&request.password, state.config.bcrypt_cost)?;

    let account = create_account(&state.db, &request.username, &request.email, &password_hash)
        .await
        .map_err(|e| match conflicting_field(&e) {
            Some("email") => BackendError::validation("email", EMAIL_TAKEN),
            Some(_) => BackendError::validation("username", USERNAME_TAKEN),
            None => BackendError::from(e),
        })?;

    let uid = encode_uid(account.id);
    let token = state.account_tokens.make_token(TokenPurpose::Activation, &account);
    let email = activation_email(&state.config, &account.email, &uid, &token);

    if let Err(e) = state.mailer.send(email).await {
        tracing::error!("Failed to send activation email to {}: {}", account.email, e);
        delete_account(&state.db, account.id).await?;
        return Err(e.into());
    }

    tracing::info!("Registered account {} ({})", account.id, account.username);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered. Activation email sent.")),
    ))
}

/// Activation handler
///
/// Redeems an activation link. The link stops working once the account is
/// active, so a second visit fails.
///
/// # Errors
///
/// * `400 Bad Request` - undecodable uid, or a token that does not verify
/// * `404 Not Found` - the uid names no account
pub async fn activate(
    State(state): State<AppState>,
    ApiPath((uid, token)): ApiPath<(String, String)>,
) -> BackendResult<Json<MessageResponse>> {
    let id = decode_uid(&uid).map_err(|_| BackendError::invalid_token("Invalid activation link"))?;

    let account = get_account_by_id(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found."))?;

    if !state
        .account_tokens
        .check_token(TokenPurpose::Activation, &account, &token)
    {
        tracing::warn!("Rejected activation token for account {}", account.id);
        return Err(BackendError::invalid_token("Invalid activation link"));
    }

    if !activate_account(&state.db, account.id).await? {
        return Err(BackendError::invalid_token("Invalid activation link"));
    }
    cache_delete(state.cache.as_ref(), &user_cache_key(account.id)).await;

    tracing::info!("Activated account {}", account.id);
    Ok(Json(MessageResponse::new("Account activated successfully")))
}
