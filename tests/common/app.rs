//! Test application
//!
//! Builds the real router on an in-memory SQLite database with the
//! in-memory mailer, and drives it with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use scribe::backend::cache::MemoryCache;
use scribe::backend::mail::MemoryMailer;
use scribe::backend::routes::create_router;
use scribe::backend::server::config::load_database;
use scribe::backend::server::AppState;
use scribe::shared::AppConfig;

pub const PUBLIC_URL: &str = "http://testserver";

/// Router plus handles on its collaborators
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: MemoryMailer,
}

/// Status and decoded JSON body (`Null` when the body is empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = AppConfig::builder()
            .database_url("sqlite::memory:")
            .jwt_secret("integration-jwt-secret")
            .secret_key("integration-account-secret")
            .public_url(PUBLIC_URL)
            .bcrypt_cost(4)
            .page_size(2)
            .build()
            .expect("test config");

        let db = load_database("sqlite::memory:").await.expect("in-memory database");
        let mailer = MemoryMailer::new();
        let state = AppState::new(db, config, Arc::new(mailer.clone()), Arc::new(MemoryCache::new()))
            .expect("app state");

        Self {
            router: create_router(state.clone()),
            state,
            mailer,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
