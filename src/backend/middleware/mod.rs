//! Middleware Module
//!
//! This module contains the request-processing pieces that run before a
//! handler body: authentication and input extraction.
//!
//! # Architecture
//!
//! - **`auth`** - `AuthUser` extractor for routes that need a logged-in caller
//! - **`extract`** - `ApiJson` / `ApiQuery` / `ApiPath`, axum extractors whose
//!   rejections use the JSON error body
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe::backend::middleware::{ApiJson, AuthUser};
//!
//! async fn create(AuthUser(user): AuthUser, ApiJson(body): ApiJson<serde_json::Value>) {
//!     let _ = (user.account_id, body);
//! }
//! ```

pub mod auth;
pub mod extract;

pub use auth::{AuthUser, AuthenticatedUser};
pub use extract::{ApiJson, ApiPath, ApiQuery};
