//! Document store implementations.
//!
//! # Stores
//!
//! - [`MemoryDocumentStore`] - in-process store for development and tests
//! - [`PgDocumentStore`] - PostgreSQL JSONB documents
//! - [`TimeoutStore`] - decorator bounding every call of another store

pub mod memory_store;
pub mod pg_document_store;
pub mod timeout_store;

#[cfg(test)]
mod delayed_store;

pub use memory_store::MemoryDocumentStore;
pub use pg_document_store::PgDocumentStore;
pub use timeout_store::TimeoutStore;

#[cfg(test)]
pub(crate) use delayed_store::DelayedStore;
