//! Middleware module
//!
//! Request-level concerns applied at the HTTP boundary

pub mod auth;

pub use auth::{bearer_token, AdminClaims};
