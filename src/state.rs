//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    ArticleService, AuthService, AuthorDirectory, CommentService, FeedService, LikeService,
    SessionContext,
};
use crate::domain::repositories::{AssetStorage, DocumentStore};
use crate::infrastructure::cache::AuthorCache;
use crate::view::ArticlePage;

/// Store type the running service is wired over.
pub type Store = dyn DocumentStore;

/// Services shared by all requests. Cloning is cheap; every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub cache: Arc<dyn AuthorCache>,
    pub authors: Arc<AuthorDirectory<Store>>,
    pub feed_service: Arc<FeedService<Store>>,
    pub article_service: Arc<ArticleService<Store>>,
    pub comment_service: Arc<CommentService<Store>>,
    pub like_service: Arc<LikeService<Store>>,
    pub auth_service: Arc<AuthService<Store>>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wires every service over one store, author cache and asset backend.
    pub fn new(
        store: Arc<Store>,
        cache: Arc<dyn AuthorCache>,
        assets: Arc<dyn AssetStorage>,
        session_signing_secret: String,
        max_upload_bytes: usize,
    ) -> Self {
        let authors = Arc::new(AuthorDirectory::new(store.clone(), cache.clone()));
        let feed_service = Arc::new(FeedService::new(store.clone()));
        let article_service = Arc::new(ArticleService::new(
            store.clone(),
            authors.clone(),
            feed_service.clone(),
            assets,
            max_upload_bytes,
        ));
        let comment_service = Arc::new(CommentService::new(store.clone(), authors.clone()));
        let like_service = Arc::new(LikeService::new(store.clone()));
        let auth_service = Arc::new(AuthService::new(
            store.clone(),
            authors.clone(),
            session_signing_secret,
        ));

        Self {
            store,
            cache,
            authors,
            feed_service,
            article_service,
            comment_service,
            like_service,
            auth_service,
            max_upload_bytes,
        }
    }

    /// Article page controller bound to `session`.
    pub fn article_page(&self, session: &SessionContext) -> ArticlePage<Store> {
        ArticlePage::new(
            self.article_service.clone(),
            self.comment_service.clone(),
            self.like_service.clone(),
            session,
        )
    }
}
