//! Article page view controller.
//!
//! Owns the locally rendered state of one article page: the article view model,
//! the comment thread and the like control. Fetches triggered by navigation
//! hydrate the state progressively and in any order. Every navigation bumps a
//! generation counter; results tagged with an older generation are dropped
//! instead of overwriting the page the user moved on to.

use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::application::services::comment_service::validate_comment_text;
use crate::application::services::{
    ArticleService, ArticleView, CommentService, LikeService, SessionContext, Subscription,
};
use crate::domain::entities::{CommentView, LikeStatus, User};
use crate::domain::repositories::DocumentStore;
use crate::error::AppError;

/// State of one independently fetched part of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    /// Fetch in flight; render a skeleton.
    Loading,
    Ready(T),
    /// The record does not exist; render fallback text.
    Missing,
    /// The fetch failed; keep the skeleton and offer a retry.
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn from_result(result: Result<T, AppError>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(e) if e.is_not_found() => Loadable::Missing,
            Err(e) => {
                warn!(code = e.code(), "page fetch failed: {}", e);
                Loadable::Failed(e.to_string())
            }
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }
}

/// User-visible alert raised by a blocked or failed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SignInRequired(String),
    Invalid(String),
    Failed(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::SignInRequired(m) | Notice::Invalid(m) | Notice::Failed(m) => m,
        }
    }
}

impl From<&AppError> for Notice {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::Unauthenticated { message, .. } => Notice::SignInRequired(message.clone()),
            AppError::Validation { message, .. } => Notice::Invalid(message.clone()),
            other => Notice::Failed(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub article_id: Option<String>,
    pub article: Loadable<ArticleView>,
    pub comments: Loadable<Vec<CommentView>>,
    pub like: Loadable<LikeStatus>,
    /// Like transition in flight; the control is disabled.
    pub like_pending: bool,
    pub user: Option<User>,
    pub notice: Option<Notice>,
}

impl PageState {
    fn blank(article_id: Option<String>, user: Option<User>) -> Self {
        Self {
            article_id,
            article: Loadable::Loading,
            comments: Loadable::Loading,
            like: Loadable::Loading,
            like_pending: false,
            user,
            notice: None,
        }
    }
}

struct Shared {
    state: RwLock<PageState>,
    /// Bumped only while `state` is write-locked.
    generation: AtomicU64,
    /// Generation owning the in-flight like transition; 0 when idle.
    like_in_flight: AtomicU64,
}

impl Shared {
    /// Applies `update` unless a newer navigation happened since `generation`.
    async fn apply(&self, generation: u64, update: impl FnOnce(&mut PageState)) -> bool {
        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale page result");
            return false;
        }
        update(&mut state);
        true
    }
}

struct InFlight<'a> {
    slot: &'a AtomicU64,
    generation: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // A navigation may already have handed the slot to a newer page.
        let _ = self
            .slot
            .compare_exchange(self.generation, 0, Ordering::SeqCst, Ordering::SeqCst);
    }
}

/// Controller for one article page.
///
/// Must be created inside a Tokio runtime: it observes the [`SessionContext`] for
/// its whole lifetime and unsubscribes when dropped.
pub struct ArticlePage<S: DocumentStore + ?Sized + 'static> {
    articles: Arc<ArticleService<S>>,
    comments: Arc<CommentService<S>>,
    likes: Arc<LikeService<S>>,
    shared: Arc<Shared>,
    _session: Subscription,
}

impl<S: DocumentStore + ?Sized + 'static> ArticlePage<S> {
    pub fn new(
        articles: Arc<ArticleService<S>>,
        comments: Arc<CommentService<S>>,
        likes: Arc<LikeService<S>>,
        session: &SessionContext,
    ) -> Self {
        let shared = Arc::new(Shared {
            state: RwLock::new(PageState::blank(None, session.current())),
            generation: AtomicU64::new(0),
            like_in_flight: AtomicU64::new(0),
        });

        let subscription = {
            let shared = shared.clone();
            let articles = articles.clone();
            let likes = likes.clone();
            session.observe(move |user| {
                let shared = shared.clone();
                let articles = articles.clone();
                let likes = likes.clone();
                async move { on_session_change(shared, articles, likes, user).await }
            })
        };

        Self {
            articles,
            comments,
            likes,
            shared,
            _session: subscription,
        }
    }

    pub async fn snapshot(&self) -> PageState {
        self.shared.state.read().await.clone()
    }

    pub async fn dismiss_notice(&self) {
        self.shared.state.write().await.notice = None;
    }

    async fn raise(&self, generation: u64, error: &AppError) {
        let notice = Notice::from(error);
        self.shared
            .apply(generation, |s| s.notice = Some(notice))
            .await;
    }

    /// Opens `article_id`, replacing whatever the page showed before.
    ///
    /// Article, comments and like status are fetched concurrently; each part is
    /// written as soon as it resolves. An empty id raises an `Invalid` notice
    /// instead of leaving the page loading.
    pub async fn navigate(&self, article_id: &str) {
        let article_id = article_id.trim().to_string();

        let (generation, user) = {
            let mut state = self.shared.state.write().await;
            let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.shared.like_in_flight.store(0, Ordering::SeqCst);
            let user = state.user.clone();
            *state = PageState::blank(
                (!article_id.is_empty()).then(|| article_id.clone()),
                user.clone(),
            );
            (generation, user)
        };

        if article_id.is_empty() {
            let err = AppError::bad_request("No article selected", json!({ "field": "article_id" }));
            self.shared
                .apply(generation, |s| {
                    s.article = Loadable::Missing;
                    s.comments = Loadable::Missing;
                    s.like = Loadable::Missing;
                    s.notice = Some(Notice::from(&err));
                })
                .await;
            return;
        }

        let shared = &self.shared;
        tokio::join!(
            async {
                let result = self.articles.load(&article_id).await;
                shared
                    .apply(generation, |s| s.article = Loadable::from_result(result))
                    .await;
            },
            async {
                let result = self.comments.list(&article_id).await;
                shared
                    .apply(generation, |s| s.comments = Loadable::from_result(result))
                    .await;
            },
            async {
                let result = self.likes.status(&article_id, user.as_ref()).await;
                shared
                    .apply(generation, |s| s.like = Loadable::from_result(result))
                    .await;
            },
        );
    }

    /// Re-reads the comment thread of the open article.
    pub async fn refresh_comments(&self) {
        let (generation, article_id, _) = self.context().await;
        let Some(article_id) = article_id else {
            return;
        };
        let result = self.comments.list(&article_id).await;
        self.shared
            .apply(generation, |s| s.comments = Loadable::from_result(result))
            .await;
    }

    /// Generation, open article and user, read as one consistent snapshot.
    async fn context(&self) -> (u64, Option<String>, Option<User>) {
        let state = self.shared.state.read().await;
        let generation = self.shared.generation.load(Ordering::SeqCst);
        (generation, state.article_id.clone(), state.user.clone())
    }

    fn no_article() -> AppError {
        AppError::bad_request("No article selected", json!({ "field": "article_id" }))
    }

    /// Likes or unlikes the open article for the signed-in user.
    ///
    /// The control updates optimistically and reverts if the write fails. While a
    /// transition is in flight on the open article further toggles are rejected
    /// with `Conflict`; navigating away releases the control.
    pub async fn toggle_like(&self) -> Result<LikeStatus, AppError> {
        let (generation, article_id, user) = self.context().await;
        let Some(article_id) = article_id else {
            return Err(Self::no_article());
        };
        let Some(user) = user else {
            let err = AppError::unauthenticated(
                "Please sign in to like this article",
                json!({ "action": "like" }),
            );
            self.raise(generation, &err).await;
            return Err(err);
        };

        if self
            .shared
            .like_in_flight
            .compare_exchange(0, generation, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::conflict(
                "A like update is already in progress",
                json!({ "article_id": article_id }),
            ));
        }
        let _in_flight = InFlight {
            slot: &self.shared.like_in_flight,
            generation,
        };

        let mut previous = Loadable::Loading;
        self.shared
            .apply(generation, |s| {
                previous = s.like.clone();
                if let Loadable::Ready(status) = s.like {
                    s.like = Loadable::Ready(status.optimistic_toggle());
                }
                s.like_pending = true;
            })
            .await;

        match self.likes.toggle(Some(&user), &article_id).await {
            Ok(status) => {
                self.shared
                    .apply(generation, |s| {
                        s.like = Loadable::Ready(status);
                        s.like_pending = false;
                    })
                    .await;
                Ok(status)
            }
            Err(e) => {
                let notice = Notice::from(&e);
                self.shared
                    .apply(generation, |s| {
                        s.like = previous;
                        s.like_pending = false;
                        s.notice = Some(notice);
                    })
                    .await;
                Err(e)
            }
        }
    }

    /// Posts a comment on the open article and appends it to the local thread.
    pub async fn submit_comment(&self, text: &str) -> Result<CommentView, AppError> {
        let (generation, article_id, user) = self.context().await;
        let Some(article_id) = article_id else {
            return Err(Self::no_article());
        };
        let Some(user) = user else {
            let err = AppError::unauthenticated(
                "Please sign in to comment",
                json!({ "action": "comment" }),
            );
            self.raise(generation, &err).await;
            return Err(err);
        };

        if let Err(e) = validate_comment_text(text) {
            self.raise(generation, &e).await;
            return Err(e);
        }

        match self.comments.append(Some(&user), &article_id, text).await {
            Ok(view) => {
                let appended = view.clone();
                self.shared
                    .apply(generation, |s| {
                        if let Loadable::Ready(list) = &mut s.comments {
                            list.push(appended);
                        }
                    })
                    .await;
                Ok(view)
            }
            Err(e) => {
                self.raise(generation, &e).await;
                Err(e)
            }
        }
    }
}

async fn on_session_change<S: DocumentStore + ?Sized>(
    shared: Arc<Shared>,
    articles: Arc<ArticleService<S>>,
    likes: Arc<LikeService<S>>,
    user: Option<User>,
) {
    let (previous, generation, article_id) = {
        let mut state = shared.state.write().await;
        let previous = std::mem::replace(&mut state.user, user.clone());
        (
            previous,
            shared.generation.load(Ordering::SeqCst),
            state.article_id.clone(),
        )
    };

    if previous.as_ref().map(|u| &u.uid) == user.as_ref().map(|u| &u.uid) {
        return;
    }

    // Only the two session holders may have just edited their own profile.
    for uid in previous.iter().chain(user.iter()).map(|u| u.uid.as_str()) {
        articles.authors().invalidate(uid).await;
    }

    if let Some(article_id) = article_id {
        let result = likes.status(&article_id, user.as_ref()).await;
        shared
            .apply(generation, |s| s.like = Loadable::from_result(result))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{AuthorDirectory, FeedService};
    use crate::domain::entities::UNKNOWN_AUTHOR;
    use crate::domain::repositories::{
        Document, MockAssetStorage, MockDocumentStore, SetOptions, StoreError,
    };
    use crate::infrastructure::cache::{AuthorCache, MockAuthorCache, NullCache};
    use crate::infrastructure::persistence::{DelayedStore, MemoryDocumentStore};
    use std::time::Duration;

    fn page_over<S: DocumentStore + ?Sized + 'static>(
        store: Arc<S>,
        session: &SessionContext,
    ) -> ArticlePage<S> {
        page_with_cache(store, Arc::new(NullCache::new()), session)
    }

    fn page_with_cache<S: DocumentStore + ?Sized + 'static>(
        store: Arc<S>,
        cache: Arc<dyn AuthorCache>,
        session: &SessionContext,
    ) -> ArticlePage<S> {
        let authors = Arc::new(AuthorDirectory::new(store.clone(), cache));
        let feed = Arc::new(FeedService::new(store.clone()));
        let articles = Arc::new(ArticleService::new(
            store.clone(),
            authors.clone(),
            feed,
            Arc::new(MockAssetStorage::new()),
            1024,
        ));
        let comments = Arc::new(CommentService::new(store.clone(), authors));
        let likes = Arc::new(LikeService::new(store));
        ArticlePage::new(articles, comments, likes, session)
    }

    async fn seeded_store() -> Arc<MemoryDocumentStore> {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .set_document("users", "U1", json!({ "displayName": "Ada" }), SetOptions::default())
            .await
            .unwrap();
        for (id, ts, author) in [("A1", 100, "U1"), ("A2", 200, "U1"), ("A3", 300, "ghost")] {
            store
                .set_document(
                    "articles",
                    id,
                    json!({
                        "title": format!("Title {id}"),
                        "category": "Technology",
                        "content": "<p>Body</p>",
                        "authorId": author,
                        "timestamp": ts,
                        "likeCount": 3,
                    }),
                    SetOptions::default(),
                )
                .await
                .unwrap();
        }
        store
            .set_document(
                "articles/A1/comments",
                "C1",
                json!({ "userId": "U1", "comment": "First!", "createdAt": 1 }),
                SetOptions::default(),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_navigate_hydrates_every_part() {
        let session = SessionContext::with_user(User::new("U1"));
        let page = page_over(seeded_store().await, &session);

        page.navigate("A1").await;
        let state = page.snapshot().await;

        let view = state.article.ready().unwrap();
        assert_eq!(view.author_name, "Ada");
        assert_eq!(state.comments.ready().unwrap().len(), 1);
        assert_eq!(
            state.like,
            Loadable::Ready(LikeStatus { liked: false, like_count: 3 })
        );
        assert!(state.notice.is_none());
    }

    #[tokio::test]
    async fn test_unknown_author_and_missing_article() {
        let session = SessionContext::new();
        let page = page_over(seeded_store().await, &session);

        page.navigate("A3").await;
        assert_eq!(
            page.snapshot().await.article.ready().unwrap().author_name,
            UNKNOWN_AUTHOR
        );

        page.navigate("missing").await;
        let state = page.snapshot().await;
        assert_eq!(state.article, Loadable::Missing);
        assert_eq!(state.like, Loadable::Missing);
    }

    #[tokio::test]
    async fn test_empty_id_raises_notice_instead_of_loading_forever() {
        let session = SessionContext::new();
        let page = page_over(seeded_store().await, &session);

        page.navigate("").await;
        let state = page.snapshot().await;

        assert!(!state.article.is_loading());
        assert!(matches!(state.notice, Some(Notice::Invalid(_))));
    }

    #[tokio::test]
    async fn test_like_toggle_scenario() {
        let session = SessionContext::with_user(User::new("U1"));
        let store = seeded_store().await;
        let page = page_over(store.clone(), &session);
        page.navigate("A1").await;

        let status = page.toggle_like().await.unwrap();
        assert_eq!(status, LikeStatus { liked: true, like_count: 4 });
        assert!(store.get_document("articles/A1/likes", "U1").await.unwrap().is_some());

        let status = page.toggle_like().await.unwrap();
        assert_eq!(status, LikeStatus { liked: false, like_count: 3 });
        let state = page.snapshot().await;
        assert_eq!(state.like, Loadable::Ready(status));
        assert!(!state.like_pending);
    }

    #[tokio::test]
    async fn test_like_without_session_prompts_sign_in() {
        let session = SessionContext::new();
        let store = seeded_store().await;
        let page = page_over(store.clone(), &session);
        page.navigate("A1").await;

        let err = page.toggle_like().await.unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated { .. }));
        assert!(matches!(page.snapshot().await.notice, Some(Notice::SignInRequired(_))));
        assert_eq!(store.count_documents("articles/A1/likes").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_comment_submission() {
        let session = SessionContext::with_user(User::new("U1").with_display_name("Ada"));
        let store = seeded_store().await;
        let page = page_over(store.clone(), &session);
        page.navigate("A1").await;

        let err = page.submit_comment("   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(matches!(page.snapshot().await.notice, Some(Notice::Invalid(_))));
        assert_eq!(store.count_documents("articles/A1/comments").await.unwrap(), 1);

        page.dismiss_notice().await;
        let view = page.submit_comment("Great read!").await.unwrap();
        assert_eq!(view.display_name, "Ada");

        let state = page.snapshot().await;
        let thread = state.comments.ready().unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[1].text, "Great read!");
        assert!(state.notice.is_none());
        assert_eq!(store.count_documents("articles/A1/comments").await.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_results_are_discarded() {
        let session = SessionContext::new();
        let store = seeded_store().await;
        let slow = Arc::new(DelayedStore::new(store, Duration::from_secs(2)).only_for("A1"));
        let page = Arc::new(page_over(slow, &session));

        let first = {
            let page = page.clone();
            tokio::spawn(async move { page.navigate("A1").await })
        };
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        page.navigate("A2").await;
        first.await.unwrap();

        let state = page.snapshot().await;
        assert_eq!(state.article_id.as_deref(), Some("A2"));
        assert_eq!(state.article.ready().unwrap().article.id, "A2");
        assert!(state.comments.ready().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_is_rejected_while_in_flight() {
        let session = SessionContext::with_user(User::new("U1"));
        let store = seeded_store().await;
        let slow = Arc::new(DelayedStore::new(store.clone(), Duration::from_secs(1)).only_for("A1"));
        let page = Arc::new(page_over(slow, &session));
        page.navigate("A1").await;

        let first = {
            let page = page.clone();
            tokio::spawn(async move { page.toggle_like().await })
        };
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        let pending = page.snapshot().await;
        assert!(pending.like_pending);
        assert_eq!(
            pending.like,
            Loadable::Ready(LikeStatus { liked: true, like_count: 4 })
        );

        let err = page.toggle_like().await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let status = first.await.unwrap().unwrap();
        assert_eq!(status, LikeStatus { liked: true, like_count: 4 });
        assert_eq!(store.count_documents("articles/A1/likes").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_toggle_reverts_optimistic_update() {
        let mut store = MockDocumentStore::new();
        store.expect_get_document().returning(|collection, id| {
            Ok(match collection {
                "articles" => Some(Document::new(
                    id,
                    json!({ "title": "T", "category": "Food", "timestamp": 1, "likeCount": 3 }),
                )),
                _ => None,
            })
        });
        store.expect_get_documents().returning(|_, _| Ok(vec![]));
        store.expect_query_collection().returning(|_, _| Ok(vec![]));
        store
            .expect_commit()
            .returning(|_| Err(StoreError::Timeout(Duration::from_secs(5))));

        let session = SessionContext::with_user(User::new("U1"));
        let page = page_over(Arc::new(store), &session);
        page.navigate("A1").await;

        let err = page.toggle_like().await.unwrap_err();

        assert!(matches!(err, AppError::Transport { .. }));
        let state = page.snapshot().await;
        assert_eq!(
            state.like,
            Loadable::Ready(LikeStatus { liked: false, like_count: 3 })
        );
        assert!(!state.like_pending);
        assert!(matches!(state.notice, Some(Notice::Failed(_))));
    }

    #[tokio::test]
    async fn test_sign_out_updates_page() {
        let session = SessionContext::with_user(User::new("U1"));
        let store = seeded_store().await;
        store
            .set_document("articles/A1/likes", "U1", json!({ "userId": "U1" }), SetOptions::default())
            .await
            .unwrap();
        let page = page_over(store, &session);
        page.navigate("A1").await;
        assert!(page.snapshot().await.like.ready().unwrap().liked);

        session.sign_out();

        let mut state = page.snapshot().await;
        for _ in 0..100 {
            if state.user.is_none() && state.like.ready().is_some_and(|s| !s.liked) {
                break;
            }
            tokio::task::yield_now().await;
            state = page.snapshot().await;
        }
        assert!(state.user.is_none());
        assert!(!state.like.ready().unwrap().liked);

        let err = page.submit_comment("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated { .. }));
    }

    #[tokio::test]
    async fn test_session_change_only_forgets_the_session_holder() {
        let mut cache = MockAuthorCache::new();
        cache.expect_get_name().returning(|_| Ok(None));
        cache.expect_set_name().returning(|_, _, _| Ok(()));
        cache
            .expect_invalidate()
            .withf(|id| id == "U1")
            .times(1)
            .returning(|_| Ok(()));
        cache.expect_clear().never();

        let session = SessionContext::with_user(User::new("U1"));
        let store = seeded_store().await;
        store
            .set_document("articles/A1/likes", "U1", json!({ "userId": "U1" }), SetOptions::default())
            .await
            .unwrap();
        let page = page_with_cache(store, Arc::new(cache), &session);
        page.navigate("A1").await;

        session.sign_out();

        // The like status is re-read after the cache entry is dropped.
        let mut state = page.snapshot().await;
        for _ in 0..100 {
            if state.like.ready().is_some_and(|s| !s.liked) {
                break;
            }
            tokio::task::yield_now().await;
            state = page.snapshot().await;
        }
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_navigation_bumps_generation_under_state_lock() {
        let session = SessionContext::new();
        let page = Arc::new(page_over(seeded_store().await, &session));
        page.navigate("A1").await;
        let before = page.shared.generation.load(Ordering::SeqCst);

        let guard = page.shared.state.write().await;
        let next = {
            let page = page.clone();
            tokio::spawn(async move { page.navigate("A2").await })
        };
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(page.shared.generation.load(Ordering::SeqCst), before);

        drop(guard);
        next.await.unwrap();

        let (generation, article_id, _) = page.context().await;
        assert_eq!(generation, before + 1);
        assert_eq!(article_id.as_deref(), Some("A2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigating_away_releases_the_like_control() {
        let session = SessionContext::with_user(User::new("U1"));
        let store = seeded_store().await;
        let slow = Arc::new(DelayedStore::new(store.clone(), Duration::from_secs(1)).only_for("A1"));
        let page = Arc::new(page_over(slow, &session));
        page.navigate("A1").await;

        let first = {
            let page = page.clone();
            tokio::spawn(async move { page.toggle_like().await })
        };
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(page.snapshot().await.like_pending);

        page.navigate("A2").await;
        let status = page.toggle_like().await.unwrap();
        assert_eq!(status, LikeStatus { liked: true, like_count: 4 });

        first.await.unwrap().unwrap();
        let state = page.snapshot().await;
        assert_eq!(state.article_id.as_deref(), Some("A2"));
        assert_eq!(
            state.like,
            Loadable::Ready(LikeStatus { liked: true, like_count: 4 })
        );
        assert!(!state.like_pending);
        assert_eq!(store.count_documents("articles/A1/likes").await.unwrap(), 1);
        assert_eq!(store.count_documents("articles/A2/likes").await.unwrap(), 1);
    }
}
