/**
 * Authentication Extractor
 *
 * This module provides the `AuthUser` extractor for handlers that require
 * an authenticated caller. It reads the `Authorization: Bearer <token>`
 * header, verifies the access token and checks that the account still
 * exists and is active.
 *
 * Handlers that take `AuthUser` reject the request with 401 before their
 * body runs; public handlers simply omit it.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::auth::sessions::TokenType;
use crate::backend::auth::users::get_account_by_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub account_id: i64,
    pub username: String,
}

/// Axum extractor for authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

/// Pull the bearer token out of the request headers
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            tracing::debug!("Missing or malformed Authorization header");
            BackendError::unauthorized("Authentication credentials were not provided.")
        })?;

        let claims = state.sessions.verify(token, TokenType::Access).map_err(|e| {
            tracing::warn!("Invalid access token: {}", e);
            BackendError::unauthorized("Given token not valid for any token type")
        })?;

        let account_id = claims
            .account_id()
            .ok_or_else(|| BackendError::unauthorized("Token contained no recognizable user identification"))?;

        let account = get_account_by_id(&state.db, account_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Access token for unknown account {}", account_id);
                BackendError::unauthorized("User not found")
            })?;

        if !account.is_active {
            return Err(BackendError::unauthorized("User is inactive"));
        }

        Ok(AuthUser(AuthenticatedUser {
            account_id: account.id,
            username: account.username,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::{activate_account, create_account};
    use crate::backend::test_support::test_state;
    use axum::http::{Request, StatusCode};

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("http://example.com");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }

    #[tokio::test]
    async fn test_active_account_is_extracted() {
        let (state, _) = test_state().await;
        let account = create_account(&state.db, "alice", "a@x.com", "hash").await.unwrap();
        activate_account(&state.db, account.id).await.unwrap();
        let pair = state.sessions.issue_pair(account.id, "alice").unwrap();

        let mut parts = parts(Some(&format!("Bearer {}", pair.access)));
        let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.account_id, account.id);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_rejections() {
        let (state, _) = test_state().await;
        let account = create_account(&state.db, "alice", "a@x.com", "hash").await.unwrap();
        let pair = state.sessions.issue_pair(account.id, "alice").unwrap();

        // missing header
        let err = AuthUser::from_request_parts(&mut parts(None), &state).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        // refresh token used as access token
        let mut p = parts(Some(&format!("Bearer {}", pair.refresh)));
        let err = AuthUser::from_request_parts(&mut p, &state).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        // inactive account
        let mut p = parts(Some(&format!("Bearer {}", pair.access)));
        let err = AuthUser::from_request_parts(&mut p, &state).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
