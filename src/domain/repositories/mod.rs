//! Store contracts for the domain layer.
//!
//! All persistence goes through [`DocumentStore`], a small document-database
//! contract (get, query, create, set, update, delete, atomic batch). Binary
//! assets go through [`AssetStorage`]. Concrete implementations live in
//! `crate::infrastructure`.
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod asset_storage;
pub mod collections;
pub mod document_store;

pub use asset_storage::AssetStorage;
pub use document_store::{
    Cursor, Direction, Document, DocumentStore, OrderBy, Precondition, Query, SetOptions,
    StoreError, StoreResult, WriteBatch, WriteOp, merge_fields, resolve_server_timestamps,
    server_timestamp,
};

#[cfg(test)]
pub use asset_storage::MockAssetStorage;
#[cfg(test)]
pub use document_store::MockDocumentStore;
