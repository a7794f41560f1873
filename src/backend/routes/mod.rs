//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs            - Module exports and documentation
//! ├── router.rs         - Main router creation, layers and fallback
//! ├── account_routes.rs - `/account/...` endpoints
//! └── blog_routes.rs    - `/blog/...` endpoints
//! ```

/// Main router creation
pub mod router;

/// Account endpoints
pub mod account_routes;

/// Blog content endpoints
pub mod blog_routes;

pub use router::create_router;
