//! Utility functions shared across layers.
//!
//! - [`id_generator`] - document ids and session tokens
//! - [`text`] - markup stripping and excerpts for article cards
//! - [`cover_url`] - cover image URL validation
//! - [`file_name`] - upload file-name sanitization

pub mod cover_url;
pub mod file_name;
pub mod id_generator;
pub mod text;
