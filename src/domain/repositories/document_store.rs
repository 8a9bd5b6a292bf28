//! Document store contract.
//!
//! The blog keeps every record (articles, users, comments, likes, sessions) in a
//! document store: named collections of JSON documents addressed by opaque ids.
//! Subcollections are plain collection paths such as `articles/{id}/comments`.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::time::Duration;

/// Field value marker replaced by the store with the commit time (epoch millis).
const SERVER_TIMESTAMP_SENTINEL: &str = "__server_timestamp__";

/// Errors surfaced by document store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("precondition failed for {collection}/{id}")]
    PreconditionFailed { collection: String, id: String },

    #[error("store request timed out after {0:?}")]
    Timeout(Duration),

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("malformed document {collection}/{id}: {reason}")]
    Malformed {
        collection: String,
        id: String,
        reason: String,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored document: its id plus the JSON object body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Deserializes the body into `T`, attributing failures to this document.
    pub fn decode<T: serde::de::DeserializeOwned>(&self, collection: &str) -> StoreResult<T> {
        serde_json::from_value(self.data.clone()).map_err(|e| StoreError::Malformed {
            collection: collection.to_string(),
            id: self.id.clone(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Position after which a query resumes: the order-by value and id of the
/// last document of the previous page.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub value: Value,
    pub id: String,
}

/// Collection query: conjunctive equality filters, one ordering, a resume
/// cursor and a limit.
///
/// Documents missing the order-by field are excluded. Ties on the order-by
/// value break on document id in the same direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<OrderBy>,
    pub start_after: Option<Cursor>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn start_after(mut self, cursor: Cursor) -> Self {
        self.start_after = Some(cursor);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Merge top-level fields into an existing document instead of replacing it.
    pub merge: bool,
}

impl SetOptions {
    pub fn merge() -> Self {
        Self { merge: true }
    }
}

/// Single mutation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Set {
        collection: String,
        id: String,
        data: Value,
        options: SetOptions,
    },
    Update {
        collection: String,
        id: String,
        patch: Value,
    },
    /// Adds `delta` to a numeric field; a missing field counts as zero.
    Increment {
        collection: String,
        id: String,
        field: String,
        delta: i64,
    },
    Delete {
        collection: String,
        id: String,
    },
    /// Removes every document of `collection` present when the batch commits.
    DeleteCollection { collection: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    Exists,
    Missing,
}

/// Atomic group of writes.
///
/// Preconditions are checked before any write is applied; if one fails or any
/// write fails, nothing is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    pub preconditions: Vec<(String, String, Precondition)>,
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(
        mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        precondition: Precondition,
    ) -> Self {
        self.preconditions
            .push((collection.into(), id.into(), precondition));
        self
    }

    pub fn set(
        mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        data: Value,
        options: SetOptions,
    ) -> Self {
        self.ops.push(WriteOp::Set {
            collection: collection.into(),
            id: id.into(),
            data,
            options,
        });
        self
    }

    pub fn update(mut self, collection: impl Into<String>, id: impl Into<String>, patch: Value) -> Self {
        self.ops.push(WriteOp::Update {
            collection: collection.into(),
            id: id.into(),
            patch,
        });
        self
    }

    pub fn increment(
        mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        field: impl Into<String>,
        delta: i64,
    ) -> Self {
        self.ops.push(WriteOp::Increment {
            collection: collection.into(),
            id: id.into(),
            field: field.into(),
            delta,
        });
        self
    }

    pub fn delete(mut self, collection: impl Into<String>, id: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Delete {
            collection: collection.into(),
            id: id.into(),
        });
        self
    }

    pub fn delete_collection(mut self, collection: impl Into<String>) -> Self {
        self.ops.push(WriteOp::DeleteCollection {
            collection: collection.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Returns the value that the store replaces with its own commit timestamp.
pub fn server_timestamp() -> Value {
    Value::String(SERVER_TIMESTAMP_SENTINEL.to_string())
}

/// Replaces server-timestamp sentinels in the top-level fields of `data`.
///
/// Timestamps are stored as epoch milliseconds so that ordering is numeric.
pub fn resolve_server_timestamps(data: &mut Value) {
    let now = Utc::now().timestamp_millis();
    if let Value::Object(fields) = data {
        for value in fields.values_mut() {
            if value.as_str() == Some(SERVER_TIMESTAMP_SENTINEL) {
                *value = Value::from(now);
            }
        }
    }
}

/// Shallow-merges the top-level fields of `patch` into `target`.
pub fn merge_fields(target: &mut Value, patch: &Value) {
    let Value::Object(patch_fields) = patch else {
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    if let Value::Object(fields) = target {
        for (key, value) in patch_fields {
            fields.insert(key.clone(), value.clone());
        }
    }
}

/// Contract of the external document store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryDocumentStore`] - in-process store
/// - [`crate::infrastructure::persistence::PgDocumentStore`] - PostgreSQL JSONB documents
/// - [`crate::infrastructure::persistence::TimeoutStore`] - timeout decorator for any store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document; `Ok(None)` when it does not exist.
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Reads several documents by id in one round trip. Missing ids are skipped.
    async fn get_documents(&self, collection: &str, ids: &[String]) -> StoreResult<Vec<Document>>;

    async fn query_collection(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>>;

    async fn count_documents(&self, collection: &str) -> StoreResult<u64>;

    /// Creates a document under a store-assigned id and returns the id.
    async fn create_document(&self, collection: &str, data: Value) -> StoreResult<String>;

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        options: SetOptions,
    ) -> StoreResult<()>;

    /// Merges `patch` into an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the document does not exist.
    async fn update_document(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()>;

    /// Deletes a document. Deleting a missing document succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Applies a [`WriteBatch`] atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PreconditionFailed`] when a precondition does not hold and
    /// [`StoreError::NotFound`] when an update or increment targets a missing document.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;
}
