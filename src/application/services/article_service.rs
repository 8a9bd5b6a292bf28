//! Article loading and authoring.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::services::feed_service::article_from_document;
use crate::application::services::{AuthorDirectory, FeedService};
use crate::domain::entities::{
    Article, ArticlePatch, ArticleSummary, Category, NewArticle, UNKNOWN_AUTHOR, UnknownCategory,
    User,
};
use crate::domain::repositories::{
    AssetStorage, DocumentStore, Precondition, StoreError, WriteBatch, collections,
};
use crate::error::AppError;
use crate::utils::cover_url::normalize_cover_url;
use crate::utils::file_name::sanitize_file_name;
use crate::utils::text::strip_html;

/// Fully hydrated article page model.
///
/// `related` is `None` when the related-articles read failed; the page renders a
/// placeholder for that panel instead of failing as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleView {
    pub article: Article,
    pub author_name: String,
    pub related: Option<Vec<ArticleSummary>>,
}

/// Raw fields of a new article as submitted by an author.
#[derive(Debug, Clone, Default)]
pub struct ArticleInput {
    pub title: String,
    pub subtitle: String,
    pub category: String,
    pub content: String,
    pub cover_image: Option<String>,
}

/// Raw fields of an article edit. `None` leaves a field unchanged; an empty
/// `cover_image` removes the cover.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
}

pub(crate) fn require_user(user: Option<&User>, action: &str) -> Result<User, AppError> {
    user.cloned().ok_or_else(|| {
        AppError::unauthenticated(
            format!("Please sign in to {action}"),
            json!({ "action": action }),
        )
    })
}

pub(crate) fn require_article_id(article_id: &str) -> Result<&str, AppError> {
    let id = article_id.trim();
    if id.is_empty() {
        return Err(AppError::bad_request(
            "Article id is required",
            json!({ "field": "article_id" }),
        ));
    }
    Ok(id)
}

fn parse_category(raw: &str) -> Result<Category, AppError> {
    raw.parse().map_err(|e: UnknownCategory| {
        AppError::bad_request(e.to_string(), json!({ "field": "category" }))
    })
}

fn parse_cover(raw: &str) -> Result<Option<String>, AppError> {
    normalize_cover_url(raw).map_err(|e| {
        AppError::bad_request(
            "Invalid cover image URL",
            json!({ "field": "cover_image", "reason": e.to_string() }),
        )
    })
}

fn required_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            format!("The {field} cannot be empty"),
            json!({ "field": field }),
        ));
    }
    Ok(trimmed.to_string())
}

fn required_content(content: &str) -> Result<String, AppError> {
    if strip_html(content).is_empty() {
        return Err(AppError::bad_request(
            "The content cannot be empty",
            json!({ "field": "content" }),
        ));
    }
    Ok(content.to_string())
}

/// Service behind the article page and the authoring flow.
pub struct ArticleService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    authors: Arc<AuthorDirectory<S>>,
    feed: Arc<FeedService<S>>,
    assets: Arc<dyn AssetStorage>,
    max_upload_bytes: usize,
}

impl<S: DocumentStore + ?Sized> ArticleService<S> {
    pub fn new(
        store: Arc<S>,
        authors: Arc<AuthorDirectory<S>>,
        feed: Arc<FeedService<S>>,
        assets: Arc<dyn AssetStorage>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            authors,
            feed,
            assets,
            max_upload_bytes,
        }
    }

    pub fn authors(&self) -> &Arc<AuthorDirectory<S>> {
        &self.authors
    }

    /// Reads one article.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty id
    /// - [`AppError::NotFound`] when no article has this id
    /// - [`AppError::Transport`] on store failures
    pub async fn get_article(&self, article_id: &str) -> Result<Article, AppError> {
        let id = require_article_id(article_id)?;

        let doc = self
            .store
            .get_document(collections::ARTICLES, id)
            .await?
            .ok_or_else(|| AppError::not_found("Article not found", json!({ "id": id })))?;

        article_from_document(&doc)
    }

    /// Resolves the author's display name, substituting [`UNKNOWN_AUTHOR`] when the
    /// profile is missing, nameless or unreadable.
    pub async fn author_name(&self, article: &Article) -> String {
        let Some(author_id) = article.author_id.as_deref() else {
            return UNKNOWN_AUTHOR.to_string();
        };

        match self.authors.display_name(author_id).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                warn!(article_id = %article.id, author_id, "author profile not found");
                UNKNOWN_AUTHOR.to_string()
            }
            Err(e) => {
                warn!(article_id = %article.id, author_id, "author lookup failed: {}", e);
                UNKNOWN_AUTHOR.to_string()
            }
        }
    }

    /// Loads the article page model: article, author name and related articles.
    ///
    /// The author and related reads run concurrently once the article is known.
    /// Neither can fail the load; see [`ArticleView`].
    pub async fn load(&self, article_id: &str) -> Result<ArticleView, AppError> {
        let article = self.get_article(article_id).await?;

        let (author_name, related) = tokio::join!(
            self.author_name(&article),
            self.feed.related(&article.category, &article.id)
        );

        let related = match related {
            Ok(related) => Some(related),
            Err(e) => {
                warn!(article_id = %article.id, "related articles unavailable: {}", e);
                None
            }
        };

        Ok(ArticleView {
            article,
            author_name,
            related,
        })
    }

    /// Publishes a new article authored by `user`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthenticated`] without a session
    /// - [`AppError::Validation`] for a blank title or content, an unknown category or a
    ///   cover that is not an http(s) URL
    pub async fn publish(&self, user: Option<&User>, input: ArticleInput) -> Result<Article, AppError> {
        let user = require_user(user, "publish an article")?;

        let new_article = NewArticle {
            title: required_text(&input.title, "title")?,
            subtitle: input.subtitle.trim().to_string(),
            category: parse_category(&input.category)?,
            content: required_content(&input.content)?,
            cover_image: match input.cover_image.as_deref() {
                Some(raw) => parse_cover(raw)?,
                None => None,
            },
            author_id: user.uid.clone(),
        };

        let id = self
            .store
            .create_document(collections::ARTICLES, new_article.to_document())
            .await?;

        info!(article_id = %id, author_id = %user.uid, category = %new_article.category, "article published");
        self.get_article(&id).await
    }

    async fn owned_article(&self, user: &User, article_id: &str) -> Result<Article, AppError> {
        let article = self.get_article(article_id).await?;
        if !article.is_authored_by(&user.uid) {
            return Err(AppError::forbidden(
                "Only the author can change this article",
                json!({ "id": article.id }),
            ));
        }
        Ok(article)
    }

    /// Applies `changes` to an article owned by `user`; the timestamp is refreshed.
    ///
    /// # Errors
    ///
    /// As [`Self::publish`], plus [`AppError::Forbidden`] for someone else's article,
    /// [`AppError::NotFound`] for a missing one and [`AppError::Validation`] when
    /// nothing would change.
    pub async fn edit(
        &self,
        user: Option<&User>,
        article_id: &str,
        changes: ArticleChanges,
    ) -> Result<Article, AppError> {
        let user = require_user(user, "edit an article")?;
        let article = self.owned_article(&user, article_id).await?;

        let patch = ArticlePatch {
            title: changes
                .title
                .as_deref()
                .map(|t| required_text(t, "title"))
                .transpose()?,
            subtitle: changes.subtitle.map(|s| s.trim().to_string()),
            category: changes.category.as_deref().map(parse_category).transpose()?,
            content: changes.content.as_deref().map(required_content).transpose()?,
            cover_image: changes.cover_image.as_deref().map(parse_cover).transpose()?,
        };

        if patch.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to update",
                json!({ "id": article.id }),
            ));
        }

        self.store
            .update_document(collections::ARTICLES, &article.id, patch.to_document())
            .await?;

        info!(article_id = %article.id, "article edited");
        self.get_article(&article.id).await
    }

    /// Deletes an article owned by `user` together with its comments and likes.
    ///
    /// All deletions are one atomic batch guarded on the article row. A comment or
    /// like written concurrently either lands before the batch and is removed with
    /// it, or fails its own article precondition.
    pub async fn delete(&self, user: Option<&User>, article_id: &str) -> Result<(), AppError> {
        let user = require_user(user, "delete an article")?;
        let article = self.owned_article(&user, article_id).await?;

        let batch = WriteBatch::new()
            .expect(collections::ARTICLES, &article.id, Precondition::Exists)
            .delete_collection(collections::comments(&article.id))
            .delete_collection(collections::likes(&article.id))
            .delete(collections::ARTICLES, &article.id);

        self.store.commit(batch).await.map_err(|e| match e {
            StoreError::PreconditionFailed { .. } => {
                AppError::not_found("Article not found", json!({ "id": article.id }))
            }
            other => other.into(),
        })?;

        info!(article_id = %article.id, "article deleted");
        Ok(())
    }

    /// Stores a cover image and returns its public URL.
    ///
    /// The asset lands at `covers/{millis}_{sanitized file name}`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthenticated`] without a session
    /// - [`AppError::Validation`] for an empty or oversized body or an unusable file name
    /// - [`AppError::Transport`] when the storage backend fails
    pub async fn upload_cover(
        &self,
        user: Option<&User>,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let user = require_user(user, "upload a cover image")?;

        if bytes.is_empty() {
            return Err(AppError::bad_request("The upload is empty", json!({})));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(AppError::bad_request(
                "The upload is too large",
                json!({ "size": bytes.len(), "max_size": self.max_upload_bytes }),
            ));
        }

        let name = sanitize_file_name(file_name)?;
        let path = format!("covers/{}_{}", Utc::now().timestamp_millis(), name);
        let url = self.assets.upload(&path, bytes).await?;

        info!(uid = %user.uid, path = %path, "cover uploaded");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{
        Document, MockAssetStorage, MockDocumentStore, SetOptions, StoreError, WriteOp,
    };
    use crate::infrastructure::cache::NullCache;
    use crate::infrastructure::persistence::MemoryDocumentStore;

    fn build<S: DocumentStore + ?Sized>(store: Arc<S>, assets: MockAssetStorage) -> ArticleService<S> {
        let authors = Arc::new(AuthorDirectory::new(store.clone(), Arc::new(NullCache::new())));
        let feed = Arc::new(FeedService::new(store.clone()));
        ArticleService::new(store, authors, feed, Arc::new(assets), 1024)
    }

    async fn memory_service() -> (Arc<MemoryDocumentStore>, ArticleService<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .set_document("users", "U1", json!({ "displayName": "Ada Lovelace" }), SetOptions::default())
            .await
            .unwrap();
        for (id, author, ts) in [("A1", "U1", 100), ("A2", "U1", 200), ("A3", "ghost", 300)] {
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
        let service = build(store.clone(), MockAssetStorage::new());
        (store, service)
    }

    fn ada() -> User {
        User::new("U1").with_display_name("Ada Lovelace")
    }

    #[tokio::test]
    async fn test_load_resolves_author_and_related() {
        let (_, service) = memory_service().await;

        let view = service.load("A1").await.unwrap();

        assert_eq!(view.article.id, "A1");
        assert_eq!(view.author_name, "Ada Lovelace");
        let related = view.related.unwrap();
        assert_eq!(related.len(), 2);
        assert!(related.iter().all(|a| a.id != "A1"));
    }

    #[tokio::test]
    async fn test_missing_author_falls_back_to_unknown() {
        let (_, service) = memory_service().await;

        let view = service.load("A3").await.unwrap();

        assert_eq!(view.author_name, UNKNOWN_AUTHOR);
    }

    #[tokio::test]
    async fn test_missing_article_is_not_found() {
        let (_, service) = memory_service().await;

        let err = service.load("nope").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_empty_id_is_validation_error() {
        let (_, service) = memory_service().await;

        let err = service.load("   ").await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_related_failure_leaves_panel_unset() {
        let mut store = MockDocumentStore::new();
        store.expect_get_document().returning(|collection, id| {
            Ok(match collection {
                "articles" => Some(Document::new(
                    id,
                    json!({ "title": "T", "category": "Food", "authorId": "U1", "timestamp": 1 }),
                )),
                _ => None,
            })
        });
        store
            .expect_get_documents()
            .returning(|_, _| Err(StoreError::Backend("down".to_string())));
        store
            .expect_query_collection()
            .returning(|_, _| Err(StoreError::Backend("down".to_string())));

        let service = build(Arc::new(store), MockAssetStorage::new());
        let view = service.load("A1").await.unwrap();

        assert_eq!(view.author_name, UNKNOWN_AUTHOR);
        assert!(view.related.is_none());
    }

    #[tokio::test]
    async fn test_publish_requires_session() {
        let (_, service) = memory_service().await;

        let err = service
            .publish(None, ArticleInput::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated { .. }));
    }

    #[tokio::test]
    async fn test_publish_validates_and_initializes() {
        let (_, service) = memory_service().await;

        let bad_category = ArticleInput {
            title: "Hello".to_string(),
            category: "Gardening".to_string(),
            content: "<p>x</p>".to_string(),
            ..Default::default()
        };
        let err = service.publish(Some(&ada()), bad_category).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let empty_content = ArticleInput {
            title: "Hello".to_string(),
            category: "Food".to_string(),
            content: "<p> </p>".to_string(),
            ..Default::default()
        };
        let err = service.publish(Some(&ada()), empty_content).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let article = service
            .publish(
                Some(&ada()),
                ArticleInput {
                    title: "  Hello  ".to_string(),
                    subtitle: "World".to_string(),
                    category: "food".to_string(),
                    content: "<p>Soup</p>".to_string(),
                    cover_image: Some("https://cdn.example.com/soup.jpg".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(article.title, "Hello");
        assert_eq!(article.category, "Food");
        assert_eq!(article.like_count, 0);
        assert_eq!(article.author_id.as_deref(), Some("U1"));
        assert_eq!(article.id.len(), 20);
    }

    #[tokio::test]
    async fn test_edit_is_author_only() {
        let (_, service) = memory_service().await;
        let intruder = User::new("U2");
        let changes = ArticleChanges {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        };

        let err = service
            .edit(Some(&intruder), "A1", changes.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));

        let edited = service.edit(Some(&ada()), "A1", changes).await.unwrap();
        assert_eq!(edited.title, "Hijacked");
        assert!(edited.created_at.timestamp_millis() > 100);
    }

    #[tokio::test]
    async fn test_edit_with_no_changes_is_rejected() {
        let (_, service) = memory_service().await;

        let err = service
            .edit(Some(&ada()), "A1", ArticleChanges::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let (store, service) = memory_service().await;
        store
            .set_document("articles/A1/comments", "C1", json!({ "comment": "hi" }), SetOptions::default())
            .await
            .unwrap();
        store
            .set_document("articles/A1/likes", "U1", json!({ "userId": "U1" }), SetOptions::default())
            .await
            .unwrap();

        service.delete(Some(&ada()), "A1").await.unwrap();

        assert!(store.get_document("articles", "A1").await.unwrap().is_none());
        assert_eq!(store.count_documents("articles/A1/comments").await.unwrap(), 0);
        assert_eq!(store.count_documents("articles/A1/likes").await.unwrap(), 0);
        assert!(store.get_document("articles", "A2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_clears_subcollections_in_the_guarded_batch() {
        let mut store = MockDocumentStore::new();
        store.expect_get_document().returning(|_, id| {
            Ok(Some(Document::new(
                id,
                json!({ "title": "T", "category": "Technology", "authorId": "U1", "timestamp": 1 }),
            )))
        });
        store
            .expect_commit()
            .withf(|batch| {
                batch.preconditions
                    == vec![("articles".to_string(), "A1".to_string(), Precondition::Exists)]
                    && batch.ops
                        == vec![
                            WriteOp::DeleteCollection {
                                collection: "articles/A1/comments".to_string(),
                            },
                            WriteOp::DeleteCollection {
                                collection: "articles/A1/likes".to_string(),
                            },
                            WriteOp::Delete {
                                collection: "articles".to_string(),
                                id: "A1".to_string(),
                            },
                        ]
            })
            .times(1)
            .returning(|_| Ok(()));

        build(Arc::new(store), MockAssetStorage::new())
            .delete(Some(&ada()), "A1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_comment_after_delete_is_rejected() {
        let (store, service) = memory_service().await;
        service.delete(Some(&ada()), "A1").await.unwrap();

        let comments = crate::application::services::CommentService::new(
            store.clone(),
            service.authors().clone(),
        );
        let err = comments.append(Some(&ada()), "A1", "late").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.count_documents("articles/A1/comments").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_cover() {
        let mut assets = MockAssetStorage::new();
        assets
            .expect_upload()
            .withf(|path, bytes| {
                path.starts_with("covers/") && path.ends_with("_my_cover.png") && bytes.len() == 3
            })
            .times(1)
            .returning(|path, _| Ok(format!("http://localhost:3000/uploads/{path}")));

        let service = build(Arc::new(MemoryDocumentStore::new()), assets);

        let url = service
            .upload_cover(Some(&ada()), "my cover.png", vec![1, 2, 3])
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:3000/uploads/covers/"));

        let err = service
            .upload_cover(Some(&ada()), "big.png", vec![0; 2048])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = service
            .upload_cover(None, "a.png", vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated { .. }));
    }
}
