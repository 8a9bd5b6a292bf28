//! Timeout decorator for any document store.

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::repositories::{
    Document, DocumentStore, Query, SetOptions, StoreError, StoreResult, WriteBatch,
};

/// Bounds every call to the wrapped store by `timeout`.
///
/// An expired call fails with [`StoreError::Timeout`], which the services surface as
/// a transport failure.
pub struct TimeoutStore {
    inner: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl TimeoutStore {
    pub fn new(inner: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = StoreResult<T>> + Send,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "store call timed out");
                Err(StoreError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl DocumentStore for TimeoutStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.bounded("get_document", self.inner.get_document(collection, id))
            .await
    }

    async fn get_documents(&self, collection: &str, ids: &[String]) -> StoreResult<Vec<Document>> {
        self.bounded("get_documents", self.inner.get_documents(collection, ids))
            .await
    }

    async fn query_collection(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        self.bounded("query_collection", self.inner.query_collection(collection, query))
            .await
    }

    async fn count_documents(&self, collection: &str) -> StoreResult<u64> {
        self.bounded("count_documents", self.inner.count_documents(collection))
            .await
    }

    async fn create_document(&self, collection: &str, data: Value) -> StoreResult<String> {
        self.bounded("create_document", self.inner.create_document(collection, data))
            .await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        options: SetOptions,
    ) -> StoreResult<()> {
        self.bounded(
            "set_document",
            self.inner.set_document(collection, id, data, options),
        )
        .await
    }

    async fn update_document(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()> {
        self.bounded("update_document", self.inner.update_document(collection, id, patch))
            .await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.bounded("delete_document", self.inner.delete_document(collection, id))
            .await
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        self.bounded("commit", self.inner.commit(batch)).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.bounded("ping", self.inner.ping()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::{DelayedStore, MemoryDocumentStore};

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_times_out() {
        let slow = DelayedStore::new(Arc::new(MemoryDocumentStore::new()), Duration::from_secs(60));
        let store = TimeoutStore::new(Arc::new(slow), Duration::from_secs(5));

        let err = store.get_document("articles", "A1").await.unwrap_err();

        assert!(matches!(err, StoreError::Timeout(d) if d == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_fast_calls_pass_through() {
        let store = TimeoutStore::new(Arc::new(MemoryDocumentStore::new()), Duration::from_secs(5));
        let id = store
            .create_document("articles", serde_json::json!({ "title": "Hi" }))
            .await
            .unwrap();

        let doc = store.get_document("articles", &id).await.unwrap().unwrap();
        assert_eq!(doc.data["title"], "Hi");
    }
}
