//! Account API integration tests
//!
//! Registration, activation, sessions, password reset and profiles through
//! the full router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_register_activate_login_logout_refresh() {
    let app = TestApp::new().await;

    register(&app, "alice", "pw1").await;
    let email = app.mailer.last_to("alice@example.com").expect("activation email");
    assert_eq!(email.subject, "Activate Your Account");
    assert!(email.body.contains(PUBLIC_URL));

    // inactive until the link is redeemed
    let response = app
        .post("/account/login", None, json!({"username": "alice", "password": "pw1"}))
        .await;
    assert_error!(
        response,
        StatusCode::FORBIDDEN,
        "Account is not activated. Please check your email."
    );

    activate(&app, "alice").await;
    let user = login(&app, "alice", "pw1").await;

    let body = assert_status!(
        app.post("/account/logout", Some(&user.access), json!({"refresh": user.refresh}))
            .await,
        StatusCode::OK
    );
    assert_eq!(body["message"], "Successfully logged out.");

    let response = app
        .post("/account/token/refresh", None, json!({"refresh": user.refresh}))
        .await;
    assert_error!(response, StatusCode::UNAUTHORIZED, "Token is blacklisted");

    // the access token issued before logout keeps working until it expires
    let response = app
        .patch(
            &format!("/account/user/{}", user.id),
            &user.access,
            json!({"first_name": "Alice"}),
        )
        .await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_activation_link_works_once() {
    let app = TestApp::new().await;
    register(&app, "bob", "pw1").await;

    let (uid, token) = link_parts(&app, "bob@example.com");
    let uri = format!("/account/register/activate/{}/{}", uid, token);

    let body = assert_status!(app.get(&uri).await, StatusCode::OK);
    assert_eq!(body["message"], "Account activated successfully");

    assert_error!(app.get(&uri).await, StatusCode::BAD_REQUEST, "Invalid activation link");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_input() {
    let app = TestApp::new().await;
    register(&app, "carol", "pw1").await;

    let response = app
        .post(
            "/account/register",
            None,
            json!({"username": "carol", "email": "other@example.com", "password": "pw1"}),
        )
        .await;
    let body = assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "username");

    let response = app
        .post(
            "/account/register",
            None,
            json!({"username": "carol2", "email": "not-an-email", "password": "pw1"}),
        )
        .await;
    let body = assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");

    let response = app.post("/account/register", None, json!({"username": "x"})).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failed_activation_email_leaves_no_account() {
    let app = TestApp::new().await;
    app.mailer.set_failing(true);

    let response = app
        .post(
            "/account/register",
            None,
            json!({"username": "dave", "email": "dave@example.com", "password": "pw1"}),
        )
        .await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);

    let users = app.get("/account/user").await;
    assert_eq!(users.body, json!([]));
}

#[tokio::test]
async fn test_token_endpoints() {
    let app = TestApp::new().await;
    register(&app, "erin", "pw1").await;

    let response = app
        .post("/account/token", None, json!({"username": "erin", "password": "pw1"}))
        .await;
    assert_error!(
        response,
        StatusCode::UNAUTHORIZED,
        "No active account found with the given credentials"
    );

    activate(&app, "erin").await;
    let body = assert_status!(
        app.post("/account/token", None, json!({"username": "erin", "password": "pw1"}))
            .await,
        StatusCode::OK
    );
    let refresh = body["refresh"].as_str().expect("refresh").to_string();

    let body = assert_status!(
        app.post("/account/token/refresh", None, json!({"refresh": refresh})).await,
        StatusCode::OK
    );
    assert!(body["access"].is_string());

    let response = app
        .post("/account/token/refresh", None, json!({"refresh": "garbage"}))
        .await;
    assert_error!(response, StatusCode::UNAUTHORIZED, "Token is invalid or expired");
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = TestApp::new().await;
    signed_in(&app, "frank").await;

    let body = assert_status!(
        app.post("/account/password-reset", None, json!({"email": "frank@example.com"}))
            .await,
        StatusCode::OK
    );
    assert_eq!(body["message"], "Password reset link sent to email.");

    // unknown addresses get the same answer
    let body = assert_status!(
        app.post("/account/password-reset", None, json!({"email": "nobody@example.com"}))
            .await,
        StatusCode::OK
    );
    assert_eq!(body["message"], "Password reset link sent to email.");

    let (uid, token) = link_parts(&app, "frank@example.com");
    let uri = format!("/account/password-reset-confirm/{}/{}", uid, token);

    let body = assert_status!(
        app.post(&uri, None, json!({"new_password": "pw2"})).await,
        StatusCode::OK
    );
    assert_eq!(body["message"], "Password reset successful");

    // the password changed, so the same link is dead
    assert_error!(
        app.post(&uri, None, json!({"new_password": "pw3"})).await,
        StatusCode::BAD_REQUEST,
        "Invalid token or user."
    );

    let response = app
        .post("/account/login", None, json!({"username": "frank", "password": "pw1"}))
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
    login(&app, "frank", "pw2").await;
}

#[tokio::test]
async fn test_new_password_invalidates_every_outstanding_reset_link() {
    let app = TestApp::new().await;
    signed_in(&app, "ivan").await;

    let mut links = Vec::new();
    for _ in 0..2 {
        assert_status!(
            app.post("/account/password-reset", None, json!({"email": "ivan@example.com"}))
                .await,
            StatusCode::OK
        );
        let (uid, token) = link_parts(&app, "ivan@example.com");
        links.push(format!("/account/password-reset-confirm/{}/{}", uid, token));
    }

    assert_status!(
        app.post(&links[0], None, json!({"new_password": "pw2"})).await,
        StatusCode::OK
    );
    assert_error!(
        app.post(&links[1], None, json!({"new_password": "pw3"})).await,
        StatusCode::BAD_REQUEST,
        "Invalid token or user."
    );
    login(&app, "ivan", "pw2").await;
}

#[tokio::test]
async fn test_activation_shows_in_cached_profile() {
    let app = TestApp::new().await;
    register(&app, "judy", "pw1").await;

    let users = assert_status!(app.get("/account/user").await, StatusCode::OK);
    let id = users[0]["id"].as_i64().expect("id");
    let uri = format!("/account/user/{}", id);

    let before = assert_status!(app.get(&uri).await, StatusCode::OK);
    assert_eq!(before["is_active"], false);

    activate(&app, "judy").await;
    let after = assert_status!(app.get(&uri).await, StatusCode::OK);
    assert_eq!(after["is_active"], true);
}

#[tokio::test]
async fn test_profiles_are_owner_only_and_cached_reads_refresh() {
    let app = TestApp::new().await;
    let grace = signed_in(&app, "grace").await;
    let heidi = signed_in(&app, "heidi").await;
    let uri = format!("/account/user/{}", grace.id);

    let body = assert_status!(app.get(&uri).await, StatusCode::OK);
    assert_eq!(body["username"], "grace");
    assert_eq!(body["first_name"], "");

    assert_error!(
        app.patch(&uri, &heidi.access, json!({"first_name": "Mallory"})).await,
        StatusCode::FORBIDDEN,
        "User doesn't match"
    );

    let body = assert_status!(
        app.patch(&uri, &grace.access, json!({"first_name": "Grace"})).await,
        StatusCode::OK
    );
    assert_eq!(body["message"], "Profile updated successfully");

    let body = assert_status!(app.get(&uri).await, StatusCode::OK);
    assert_eq!(body["first_name"], "Grace");

    let response = app.patch(&uri, &grace.access, json!({"username": "heidi"})).await;
    let body = assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "username");

    assert_status!(app.delete(&uri, &grace.access).await, StatusCode::NO_CONTENT);
    assert_error!(app.get(&uri).await, StatusCode::NOT_FOUND, "User not found.");
}

#[tokio::test]
async fn test_missing_or_bad_access_token() {
    let app = TestApp::new().await;

    assert_error!(
        app.post("/account/logout", None, json!({"refresh": "x"})).await,
        StatusCode::UNAUTHORIZED,
        "Authentication credentials were not provided."
    );
    assert_error!(
        app.post("/account/logout", Some("not-a-jwt"), json!({"refresh": "x"}))
            .await,
        StatusCode::UNAUTHORIZED,
        "Given token not valid for any token type"
    );
}
