//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for document persistence, caching and asset storage.
//!
//! # Modules
//!
//! - [`cache`] - author name caches (Redis, in-memory and no-op implementations)
//! - [`persistence`] - document stores (PostgreSQL, in-memory, timeout decorator)
//! - [`storage`] - cover image storage on local disk

pub mod cache;
pub mod persistence;
pub mod storage;
