//! JSON API over the article, comment, like and session services.
//!
//! Handlers stay thin: they extract the optional session user, validate the request
//! DTO and hand both to a service. Service errors render through
//! [`crate::error::AppError`].

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
