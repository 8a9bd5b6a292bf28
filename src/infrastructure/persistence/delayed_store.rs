//! Store wrapper that delays reads, for exercising timeouts and late responses.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::repositories::{
    Document, DocumentStore, Query, SetOptions, StoreResult, WriteBatch,
};

/// Delays `get_document` calls before delegating to `inner`.
///
/// With no ids registered every document read is delayed; otherwise only reads of
/// the registered ids are.
pub struct DelayedStore {
    inner: Arc<dyn DocumentStore>,
    delay: Duration,
    ids: HashSet<String>,
}

impl DelayedStore {
    pub fn new(inner: Arc<dyn DocumentStore>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            ids: HashSet::new(),
        }
    }

    pub fn only_for(mut self, id: impl Into<String>) -> Self {
        self.ids.insert(id.into());
        self
    }

    async fn pause(&self, id: &str) {
        if self.ids.is_empty() || self.ids.contains(id) {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl DocumentStore for DelayedStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.pause(id).await;
        self.inner.get_document(collection, id).await
    }

    async fn get_documents(&self, collection: &str, ids: &[String]) -> StoreResult<Vec<Document>> {
        self.inner.get_documents(collection, ids).await
    }

    async fn query_collection(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        self.inner.query_collection(collection, query).await
    }

    async fn count_documents(&self, collection: &str) -> StoreResult<u64> {
        self.inner.count_documents(collection).await
    }

    async fn create_document(&self, collection: &str, data: Value) -> StoreResult<String> {
        self.inner.create_document(collection, data).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        options: SetOptions,
    ) -> StoreResult<()> {
        self.inner.set_document(collection, id, data, options).await
    }

    async fn update_document(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()> {
        self.inner.update_document(collection, id, patch).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.inner.delete_document(collection, id).await
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        self.inner.commit(batch).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}
