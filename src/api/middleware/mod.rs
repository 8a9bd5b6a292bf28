//! HTTP middleware for request processing.
//!
//! Provides bearer session resolution and request tracing.

pub mod auth;
pub mod tracing;

pub use auth::CurrentUser;
