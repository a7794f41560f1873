//! Account test helpers
//!
//! Drive the public registration flow and pull links out of the emails the
//! in-memory mailer captured.

use serde_json::json;

use super::app::TestApp;

/// Tokens of a logged-in account
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub access: String,
    pub refresh: String,
}

pub fn email_for(username: &str) -> String {
    format!("{}@example.com", username)
}

/// `(uid, token)` from the last link mailed to `to`
pub fn link_parts(app: &TestApp, to: &str) -> (String, String) {
    let email = app.mailer.last_to(to).expect("no email sent");
    let link = email
        .body
        .split_whitespace()
        .find(|word| word.starts_with("http"))
        .expect("no link in email");
    let mut parts = link.rsplit('/');
    let token = parts.next().expect("token").to_string();
    let uid = parts.next().expect("uid").to_string();
    (uid, token)
}

pub async fn register(app: &TestApp, username: &str, password: &str) {
    let response = app
        .post(
            "/account/register",
            None,
            json!({"username": username, "email": email_for(username), "password": password}),
        )
        .await;
    assert_eq!(response.status, axum::http::StatusCode::CREATED, "{}", response.body);
}

pub async fn activate(app: &TestApp, username: &str) {
    let (uid, token) = link_parts(app, &email_for(username));
    let response = app
        .get(&format!("/account/register/activate/{}/{}", uid, token))
        .await;
    assert_eq!(response.status, axum::http::StatusCode::OK, "{}", response.body);
}

pub async fn login(app: &TestApp, username: &str, password: &str) -> TestUser {
    let response = app
        .post("/account/login", None, json!({"username": username, "password": password}))
        .await;
    assert_eq!(response.status, axum::http::StatusCode::OK, "{}", response.body);

    let users = app.get("/account/user").await;
    let id = users.body
        .as_array()
        .and_then(|users| users.iter().find(|user| user["username"] == username))
        .and_then(|user| user["id"].as_i64())
        .expect("user listed");

    TestUser {
        id,
        username: username.to_string(),
        password: password.to_string(),
        access: response.body["access"].as_str().expect("access").to_string(),
        refresh: response.body["refresh"].as_str().expect("refresh").to_string(),
    }
}

/// Register, activate and log in
pub async fn signed_in(app: &TestApp, username: &str) -> TestUser {
    register(app, username, "pw1").await;
    activate(app, username).await;
    login(app, username, "pw1").await
}
