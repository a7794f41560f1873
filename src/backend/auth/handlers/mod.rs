//! Account Handlers Module
//!
//! This module contains all HTTP handlers for the account endpoints.
//! Handlers are organized into focused submodules for maintainability.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs            - Module exports and documentation
//! ├── types.rs          - Request and response types
//! ├── register.rs       - Registration and activation
//! ├── login.rs          - Credential check and login
//! ├── logout.rs         - Refresh token revocation
//! ├── token.rs          - Token pair and token refresh endpoints
//! ├── password_reset.rs - Reset request and confirmation
//! └── user.rs           - Profile list/read/update/delete
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /account/register
//! - **`activate`** - GET /account/register/activate/{uid}/{token}
//! - **`login`** - POST /account/login
//! - **`logout`** - POST /account/logout (requires authentication)
//! - **`request_password_reset`** - POST /account/password-reset
//! - **`confirm_password_reset`** - POST /account/password-reset-confirm/{uid}/{token}
//! - **`list_users`**, **`get_user`** - GET /account/user, /account/user/{id}
//! - **`update_user`**, **`delete_user`** - PUT/PATCH/DELETE /account/user/{id} (owner only)
//! - **`obtain_token_pair`** - POST /account/token
//! - **`refresh_access_token`** - POST /account/token/refresh
//!
//! # Account Lifecycle
//!
//! 1. **Register**: account created inactive, activation link emailed
//! 2. **Activate**: link verified against the account's current state
//! 3. **Login**: credentials verified, access/refresh pair returned
//! 4. **Logout**: refresh token blacklisted

/// Request and response types
pub mod types;

pub mod register;
pub mod login;
pub mod logout;
pub mod token;
pub mod password_reset;
pub mod user;

pub use types::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UserResponse};

pub use login::login;
pub use logout::logout;
pub use password_reset::{confirm_password_reset, request_password_reset};
pub use register::{activate, register};
pub use token::{obtain_token_pair, refresh_access_token};
pub use user::{delete_user, get_user, list_users, update_user};
