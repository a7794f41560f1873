//! Backend Module
//!
//! All server-side code: the Axum HTTP server, the account lifecycle, the
//! blog content store and the collaborators they depend on.
//!
//! # Architecture
//!
//! - **`server`** - Startup, application state, service loading
//! - **`routes`** - Route configuration and router assembly
//! - **`auth`** - Accounts, passwords, JWT sessions, account tokens
//! - **`blog`** - Blogs, comments, tags, menus, categories
//! - **`middleware`** - Authenticated-user and input extractors
//! - **`mail`** - Outbound mail transports
//! - **`cache`** - Best-effort key-value cache
//! - **`error`** - Backend error type and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - `scribe-server` binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Account lifecycle
//! ├── blog/           - Content store
//! ├── middleware/     - Request extractors
//! ├── mail/           - Mail transports
//! ├── cache/          - Cache store
//! └── error/          - Error types
//! ```
//!
//! # Error Handling
//!
//! Handlers return `BackendResult<T>`; `BackendError` renders as
//! `{"error": ..., "status": ...}` with the matching status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Account management and authentication
pub mod auth;

/// Blog content
pub mod blog;

/// Request extractors
pub mod middleware;

/// Outbound mail
pub mod mail;

/// Best-effort cache
pub mod cache;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::BackendError;
pub use server::create_app;
