/**
 * Account Routes
 *
 * Registration, activation, sessions, password reset and profiles.
 *
 * # Routes
 *
 * - `POST /account/register` - Create an inactive account
 * - `GET /account/register/activate/{uid}/{token}` - Redeem an activation link
 * - `POST /account/login` - Token pair plus username
 * - `POST /account/logout` - Revoke a refresh token (requires authentication)
 * - `POST /account/password-reset` - Email a reset link
 * - `POST /account/password-reset-confirm/{uid}/{token}` - Set a new password
 * - `GET /account/user` - List profiles
 * - `GET|PUT|PATCH|DELETE /account/user/{id}` - One profile (writes are owner only)
 * - `POST /account/token` - Token pair
 * - `POST /account/token/refresh` - New access token from a refresh token
 */

use axum::routing::{get, post};
use axum::Router;

use crate::backend::auth::handlers::{
    activate, confirm_password_reset, delete_user, get_user, list_users, login, logout, obtain_token_pair,
    refresh_access_token, register, request_password_reset, update_user,
};
use crate::backend::server::state::AppState;

/// Configure account routes
pub fn configure_account_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/account/register", post(register))
        .route("/account/register/activate/{uid}/{token}", get(activate))
        .route("/account/login", post(login))
        .route("/account/logout", post(logout))
        .route("/account/password-reset", post(request_password_reset))
        .route(
            "/account/password-reset-confirm/{uid}/{token}",
            post(confirm_password_reset),
        )
        .route("/account/user", get(list_users))
        .route(
            "/account/user/{id}",
            get(get_user).put(update_user).patch(update_user).delete(delete_user),
        )
        .route("/account/token", post(obtain_token_pair))
        .route("/account/token/refresh", post(refresh_access_token))
}
