//! Blog Handlers Module
//!
//! HTTP handlers for the `/blog` endpoints, one submodule per resource.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Request, query and response types
//! ├── blogs.rs      - Blog list (filtered, paginated) and CRUD
//! ├── comments.rs   - Comment list (paginated, threaded) and CRUD
//! ├── tags.rs       - Tag CRUD
//! ├── menus.rs      - Menu CRUD
//! └── categories.rs - Category CRUD and tree queries
//! ```
//!
//! # Access
//!
//! - Reads need no credentials
//! - Writes need an access token (`AuthUser`)
//! - Blogs and comments can only be updated or deleted by their author

/// Request and response types
pub mod types;

pub mod blogs;
pub mod categories;
pub mod comments;
pub mod menus;
pub mod tags;

pub use types::{BlogResponse, CategoryResponse};
