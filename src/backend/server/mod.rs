//! Server Module
//!
//! This module contains the code that initializes and configures the Axum
//! HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Database, mailer and cache loading
//! └── init.rs   - Startup sequence and background maintenance
//! ```
//!
//! # State Management
//!
//! `AppState` holds the database pool, the configuration, the signing keys
//! and the mail/cache collaborators. Handlers take `State<AppState>`, or
//! `State<SqlitePool>` when the pool is all they need.
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe::backend::server::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app().await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Service loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::{create_app, create_app_with, StartupError};
pub use state::AppState;
