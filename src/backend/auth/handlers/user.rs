/**
 * Profile Handlers
 *
 * - `GET /account/user` lists profiles
 * - `GET /account/user/{id}` reads one profile through the cache
 * - `PUT|PATCH /account/user/{id}` edits the caller's own profile
 * - `DELETE /account/user/{id}` deletes the caller's own account
 *
 * Single profiles are cached under `user:{id}`; writes drop the entry.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{MessageResponse, UpdateProfileRequest, UserResponse};
use crate::backend::auth::users::{
    conflicting_field, delete_account, get_account_by_id, list_accounts, update_profile, Account, ProfileFields,
};
use crate::backend::cache::{cache_delete, cache_get_or_set};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiJson, ApiPath, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::validation::{validate_email, validate_username};

pub fn user_cache_key(id: i64) -> String {
    format!("user:{}", id)
}

/// List all profiles
pub async fn list_users(State(pool): State<SqlitePool>) -> BackendResult<Json<Vec<UserResponse>>> {
    let accounts = list_accounts(&pool).await?;
    Ok(Json(accounts.iter().map(UserResponse::from).collect()))
}

/// Read one profile
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<Json<UserResponse>> {
    let db = state.db.clone();
    let profile = cache_get_or_set(
        state.cache.as_ref(),
        &user_cache_key(id),
        state.config.cache_timeout,
        || async move {
            let account = get_account_by_id(&db, id).await?;
            Ok::<_, BackendError>(account.as_ref().map(UserResponse::from))
        },
    )
    .await?;

    profile
        .map(Json)
        .ok_or_else(|| BackendError::not_found("User not found."))
}

/// Load the target account and check the caller owns it
async fn owned_account(state: &AppState, user: &AuthUser, id: i64) -> BackendResult<Account> {
    let account = get_account_by_id(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found."))?;

    if account.id != user.0.account_id {
        tracing::warn!("User {} tried to modify account {}", user.0.username, id);
        return Err(BackendError::forbidden("User doesn't match"));
    }
    Ok(account)
}

/// Edit the caller's profile
///
/// Absent fields keep their value; `"profile_image": null` removes the image.
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> BackendResult<Json<MessageResponse>> {
    let account = owned_account(&state, &user, id).await?;

    let mut fields = ProfileFields {
        username: account.username,
        email: account.email,
        first_name: account.first_name,
        last_name: account.last_name,
        profile_image: account.profile_image,
    };

    if let Some(username) = request.username {
        validate_username(&username)?;
        fields.username = username;
    }
    if let Some(email) = request.email {
        validate_email(&email)?;
        fields.email = email;
    }
    if let Some(first_name) = request.first_name {
        fields.first_name = first_name;
    }
    if let Some(last_name) = request.last_name {
        fields.last_name = last_name;
    }
    if let Some(image) = request.profile_image {
        fields.profile_image = match image {
            Some(encoded) => Some(
                STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|_| BackendError::validation("profile_image", "Upload a valid image."))?,
            ),
            None => None,
        };
    }

    update_profile(&state.db, id, &fields)
        .await
        .map_err(|e| match conflicting_field(&e) {
            Some("email") => BackendError::validation("email", "A user with that email already exists."),
            Some(_) => BackendError::validation("username", "A user with that username already exists."),
            None => BackendError::from(e),
        })?;

    cache_delete(state.cache.as_ref(), &user_cache_key(id)).await;

    tracing::info!("Profile updated for account {}", id);
    Ok(Json(MessageResponse::new("Profile updated successfully")))
}

/// Delete the caller's account
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> BackendResult<StatusCode> {
    owned_account(&state, &user, id).await?;

    delete_account(&state.db, id).await?;
    cache_delete(state.cache.as_ref(), &user_cache_key(id)).await;

    tracing::info!("Account {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::{active_account, auth_user, test_state};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_list_and_get() {
        let (state, _) = test_state().await;
        let alice = active_account(&state, "alice").await;
        active_account(&state, "bob").await;

        let Json(users) = list_users(State(state.db.clone())).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");

        let Json(profile) = get_user(State(state.clone()), ApiPath(alice.id)).await.unwrap();
        assert_eq!(profile.email, "alice@x.com");

        let err = get_user(State(state), ApiPath(999)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_invalidates_cache() {
        let (state, _) = test_state().await;
        let alice = active_account(&state, "alice").await;

        // warm the cache
        get_user(State(state.clone()), ApiPath(alice.id)).await.unwrap();

        let request = UpdateProfileRequest {
            first_name: Some("Alice".to_string()),
            profile_image: Some(Some(STANDARD.encode([1u8, 2, 3]))),
            ..Default::default()
        };
        let Json(body) = update_user(State(state.clone()), auth_user(&alice), ApiPath(alice.id), ApiJson(request))
            .await
            .unwrap();
        assert_eq!(body.message, "Profile updated successfully");

        let Json(profile) = get_user(State(state.clone()), ApiPath(alice.id)).await.unwrap();
        assert_eq!(profile.first_name, "Alice");
        assert_eq!(profile.profile_image.as_deref(), Some("AQID"));

        let clear = UpdateProfileRequest {
            profile_image: Some(None),
            ..Default::default()
        };
        update_user(State(state.clone()), auth_user(&alice), ApiPath(alice.id), ApiJson(clear))
            .await
            .unwrap();
        let Json(profile) = get_user(State(state), ApiPath(alice.id)).await.unwrap();
        assert_eq!(profile.profile_image, None);
        assert_eq!(profile.first_name, "Alice");
    }

    #[tokio::test]
    async fn test_cannot_edit_someone_else() {
        let (state, _) = test_state().await;
        let alice = active_account(&state, "alice").await;
        let bob = active_account(&state, "bob").await;

        let err = update_user(
            State(state.clone()),
            auth_user(&bob),
            ApiPath(alice.id),
            ApiJson(UpdateProfileRequest::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "User doesn't match");

        let err = delete_user(State(state), auth_user(&bob), ApiPath(alice.id)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_username_conflict() {
        let (state, _) = test_state().await;
        let alice = active_account(&state, "alice").await;
        active_account(&state, "bob").await;

        let request = UpdateProfileRequest {
            username: Some("bob".to_string()),
            ..Default::default()
        };
        let err = update_user(State(state), auth_user(&alice), ApiPath(alice.id), ApiJson(request))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("username"));
    }

    #[tokio::test]
    async fn test_delete_self() {
        let (state, _) = test_state().await;
        let alice = active_account(&state, "alice").await;
        get_user(State(state.clone()), ApiPath(alice.id)).await.unwrap();

        let status = delete_user(State(state.clone()), auth_user(&alice), ApiPath(alice.id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = get_user(State(state), ApiPath(alice.id)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
