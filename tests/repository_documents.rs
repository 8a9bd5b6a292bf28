//! PostgreSQL document store tests. Each test gets a fresh database with the
//! migrations applied.

mod common;

use quill_blog::domain::repositories::{
    Cursor, Direction, DocumentStore, Precondition, Query, SetOptions, StoreError, WriteBatch,
};
use quill_blog::infrastructure::persistence::PgDocumentStore;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

async fn store_with_article(pool: PgPool) -> PgDocumentStore {
    let store = PgDocumentStore::new(Arc::new(pool));
    store
        .set_document(
            "articles",
            "A1",
            json!({ "title": "Soup", "timestamp": 100, "likeCount": 3 }),
            SetOptions::default(),
        )
        .await
        .unwrap();
    store
}

fn like_batch() -> WriteBatch {
    WriteBatch::new()
        .expect("articles/A1/likes", "U1", Precondition::Missing)
        .set("articles/A1/likes", "U1", json!({ "userId": "U1" }), SetOptions::default())
        .increment("articles", "A1", "likeCount", 1)
}

fn unlike_batch() -> WriteBatch {
    WriteBatch::new()
        .expect("articles/A1/likes", "U1", Precondition::Exists)
        .delete("articles/A1/likes", "U1")
        .increment("articles", "A1", "likeCount", -1)
}

async fn like_count(store: &PgDocumentStore) -> i64 {
    let doc = store.get_document("articles", "A1").await.unwrap().unwrap();
    doc.data["likeCount"].as_i64().unwrap()
}

#[sqlx::test]
async fn test_like_and_unlike_move_the_counter(pool: PgPool) {
    let store = store_with_article(pool).await;

    store.commit(like_batch()).await.unwrap();
    assert_eq!(like_count(&store).await, 4);
    assert!(store.get_document("articles/A1/likes", "U1").await.unwrap().is_some());

    store.commit(unlike_batch()).await.unwrap();
    assert_eq!(like_count(&store).await, 3);
    assert!(store.get_document("articles/A1/likes", "U1").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_failed_precondition_rolls_back_the_batch(pool: PgPool) {
    let store = store_with_article(pool).await;
    store.commit(like_batch()).await.unwrap();

    let result = store.commit(like_batch()).await;

    assert!(matches!(
        result,
        Err(StoreError::PreconditionFailed { ref collection, ref id })
            if collection == "articles/A1/likes" && id == "U1"
    ));
    assert_eq!(like_count(&store).await, 4);
    assert_eq!(store.count_documents("articles/A1/likes").await.unwrap(), 1);
}

#[sqlx::test]
async fn test_failing_write_undoes_earlier_writes(pool: PgPool) {
    let store = store_with_article(pool).await;

    let batch = WriteBatch::new()
        .increment("articles", "A1", "likeCount", 1)
        .increment("articles", "missing", "likeCount", 1);
    let result = store.commit(batch).await;

    assert!(matches!(result, Err(StoreError::NotFound { .. })));
    assert_eq!(like_count(&store).await, 3);
}

#[sqlx::test]
async fn test_cursor_pages_newest_first(pool: PgPool) {
    let store = PgDocumentStore::new(Arc::new(pool));
    for (id, ts) in [("A1", 100), ("A2", 300), ("A3", 200), ("A4", 300)] {
        store
            .set_document(
                "articles",
                id,
                json!({ "category": "Food", "timestamp": ts }),
                SetOptions::default(),
            )
            .await
            .unwrap();
    }
    store
        .set_document("articles", "A5", json!({ "category": "Food" }), SetOptions::default())
        .await
        .unwrap();

    let first = store
        .query_collection(
            "articles",
            &Query::new()
                .where_eq("category", "Food")
                .order_by("timestamp", Direction::Descending)
                .limit(2),
        )
        .await
        .unwrap();
    let ids: Vec<&str> = first.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["A4", "A2"]);

    let last = &first[1];
    let second = store
        .query_collection(
            "articles",
            &Query::new()
                .where_eq("category", "Food")
                .order_by("timestamp", Direction::Descending)
                .start_after(Cursor {
                    value: last.data["timestamp"].clone(),
                    id: last.id.clone(),
                })
                .limit(2),
        )
        .await
        .unwrap();
    let ids: Vec<&str> = second.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["A3", "A1"]);
}

#[sqlx::test]
async fn test_article_delete_clears_subcollections(pool: PgPool) {
    let store = store_with_article(pool).await;
    store.commit(like_batch()).await.unwrap();
    store
        .set_document(
            "articles/A1/comments",
            "C1",
            json!({ "userId": "U1", "comment": "First!", "createdAt": 1 }),
            SetOptions::default(),
        )
        .await
        .unwrap();

    let batch = WriteBatch::new()
        .expect("articles", "A1", Precondition::Exists)
        .delete_collection("articles/A1/comments")
        .delete_collection("articles/A1/likes")
        .delete("articles", "A1");
    store.commit(batch.clone()).await.unwrap();

    assert!(store.get_document("articles", "A1").await.unwrap().is_none());
    assert_eq!(store.count_documents("articles/A1/comments").await.unwrap(), 0);
    assert_eq!(store.count_documents("articles/A1/likes").await.unwrap(), 0);

    let again = store.commit(batch).await;
    assert!(matches!(again, Err(StoreError::PreconditionFailed { .. })));
}
