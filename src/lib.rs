//! Scribe - Blog Platform Backend
//!
//! Scribe is an HTTP/JSON backend for a blog: account registration with email
//! activation, JWT sessions with refresh token revocation, password reset,
//! and CRUD for blogs, threaded comments, tags, hierarchical categories and
//! menus.
//!
//! # Module Structure
//!
//! - **`shared`** - Types that do not depend on the HTTP layer
//!   - Validation and serialization errors
//!   - Application configuration
//!
//! - **`backend`** - Server-side code
//!   - Axum router, application state, configuration loading
//!   - Account lifecycle (`backend::auth`)
//!   - Content store (`backend::blog`)
//!   - Mail transport and best-effort cache collaborators
//!
//! # Usage
//!
//! ```rust,no_run
//! use scribe::backend::server::init::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app().await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for invalid input
//! - `backend::error::BackendError` for everything a handler can return;
//!   it converts into a JSON error response

/// Shared types and configuration
pub mod shared;

/// Backend server-side code
pub mod backend;
