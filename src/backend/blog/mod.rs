//! Blog Content Module
//!
//! Storage and HTTP handlers for everything under `/blog`: blogs, threaded
//! comments, tags, menus and hierarchical categories.
//!
//! # Module Structure
//!
//! ```text
//! blog/
//! ├── mod.rs           - Module exports and documentation
//! ├── blogs.rs         - Blog rows, list filters, tag links
//! ├── comments.rs      - Comment rows
//! ├── comment_tree.rs  - Reply thread assembly
//! ├── tags.rs          - Tag rows
//! ├── menus.rs         - Menu rows
//! ├── categories.rs    - Category rows
//! ├── category_tree.rs - In-memory category hierarchy
//! ├── pagination.rs    - Page-number pagination
//! └── handlers/        - HTTP handlers
//! ```
//!
//! Reads are public. Writes require an access token; blogs and comments
//! can only be changed by their author.

pub mod blogs;
pub mod categories;
pub mod category_tree;
pub mod comment_tree;
pub mod comments;
pub mod menus;
pub mod pagination;
pub mod tags;

/// HTTP handlers
pub mod handlers;

pub use blogs::{Blog, BlogFilter};
pub use categories::Category;
pub use category_tree::CategoryTree;
pub use comment_tree::{CommentNode, ReplyIndex};
pub use comments::Comment;
pub use menus::Menu;
pub use pagination::{Page, PageWindow};
pub use tags::Tag;
