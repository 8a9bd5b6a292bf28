#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use quill_blog::domain::entities::User;
use quill_blog::domain::repositories::{DocumentStore, SetOptions};
use quill_blog::infrastructure::cache::MemoryCache;
use quill_blog::infrastructure::persistence::MemoryDocumentStore;
use quill_blog::infrastructure::storage::LocalAssetStorage;
use quill_blog::routes::build_router;
use quill_blog::state::AppState;
use quill_blog::utils::id_generator::generate_document_id;

pub const MAX_UPLOAD_BYTES: usize = 1024;

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<MemoryDocumentStore>,
    pub upload_dir: PathBuf,
}

impl TestApp {
    /// Issues a session for `uid` and returns the raw bearer token.
    pub async fn token_for(&self, uid: &str, name: Option<&str>) -> String {
        let mut user = User::new(uid);
        user.display_name = name.map(str::to_string);
        self.state.auth_service.issue_session(&user).await.unwrap()
    }
}

pub fn create_test_app() -> TestApp {
    let store = Arc::new(MemoryDocumentStore::new());
    let upload_dir = std::env::temp_dir().join(format!("quill-it-{}", generate_document_id()));

    let state = AppState::new(
        store.clone(),
        Arc::new(MemoryCache::new(60)),
        Arc::new(LocalAssetStorage::new(&upload_dir, "http://localhost:3000")),
        "test-signing-secret".to_string(),
        MAX_UPLOAD_BYTES,
    );

    let server = TestServer::new(build_router(state.clone(), &upload_dir)).unwrap();

    TestApp {
        server,
        state,
        store,
        upload_dir,
    }
}

pub async fn create_test_user(store: &MemoryDocumentStore, uid: &str, name: &str) {
    store
        .set_document("users", uid, json!({ "displayName": name }), SetOptions::default())
        .await
        .unwrap();
}

pub async fn create_test_article(
    store: &MemoryDocumentStore,
    id: &str,
    category: &str,
    timestamp: i64,
    author_id: &str,
    like_count: i64,
) {
    store
        .set_document(
            "articles",
            id,
            json!({
                "title": format!("Article {id}"),
                "subtitle": "",
                "category": category,
                "content": format!("<p>Body of {id}</p>"),
                "authorId": author_id,
                "timestamp": timestamp,
                "likeCount": like_count,
            }),
            SetOptions::default(),
        )
        .await
        .unwrap();
}

pub async fn create_test_comment(
    store: &MemoryDocumentStore,
    article_id: &str,
    id: &str,
    user_id: &str,
    text: &str,
    created_at: i64,
) {
    store
        .set_document(
            &format!("articles/{article_id}/comments"),
            id,
            json!({ "userId": user_id, "comment": text, "createdAt": created_at }),
            SetOptions::default(),
        )
        .await
        .unwrap();
}

pub async fn count(store: &MemoryDocumentStore, collection: &str) -> u64 {
    store.count_documents(collection).await.unwrap()
}
