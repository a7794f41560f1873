//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - `TestApp`, the full router on an in-memory database
//! - Account helpers (register, activate, login)
//! - Custom assertion macros

#![allow(dead_code)]

pub mod app;
pub mod assertions;
pub mod auth_helpers;

pub use app::*;
pub use auth_helpers::*;
