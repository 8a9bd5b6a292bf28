//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod articles;
pub mod comments;
pub mod health;
pub mod likes;
pub mod pagination;
pub mod uploads;
