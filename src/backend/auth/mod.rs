//! Account Module
//!
//! This module handles the account lifecycle: registration with email
//! activation, login, logout, password reset, profiles, and the
//! access/refresh token pair.
//!
//! # Architecture
//!
//! - **`users`** - Account model and database operations
//! - **`password`** - bcrypt hashing
//! - **`sessions`** - JWT access/refresh tokens
//! - **`blacklist`** - Revoked refresh tokens
//! - **`tokens`** - Stateless activation and password reset tokens
//! - **`emails`** - Activation and reset email content
//! - **`handlers`** - HTTP handlers for the account endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - Account model and database operations
//! ├── password.rs     - Password hashing
//! ├── sessions.rs     - JWT token management
//! ├── blacklist.rs    - Refresh token blacklist
//! ├── tokens.rs       - Activation / reset tokens and uids
//! ├── emails.rs       - Outgoing account emails
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Access tokens are short-lived; refresh tokens can be revoked
//! - Activation and reset links verify against the account state, so
//!   they stop working once used
//! - Invalid credentials return 401 (no information leakage)

/// Account data model and database operations
pub mod users;

/// Password hashing
pub mod password;

/// JWT token generation and validation
pub mod sessions;

/// Refresh token revocation
pub mod blacklist;

/// Activation and password reset tokens
pub mod tokens;

/// Account emails
pub mod emails;

/// HTTP handlers for account endpoints
pub mod handlers;

pub use handlers::types::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
pub use sessions::{Claims, SessionKeys, TokenType};
pub use users::Account;
