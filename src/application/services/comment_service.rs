//! Comment thread of an article.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::services::AuthorDirectory;
use crate::application::services::article_service::{require_article_id, require_user};
use crate::domain::entities::{
    ANONYMOUS, Comment, CommentView, MAX_COMMENT_CHARS, NewComment, User,
};
use crate::domain::repositories::{
    Direction, Document, DocumentStore, Precondition, Query, SetOptions, StoreError, WriteBatch,
    collections,
};
use crate::error::AppError;
use crate::utils::id_generator::generate_document_id;

const CREATED_AT_FIELD: &str = "createdAt";

fn comment_from_document(collection: &str, doc: &Document) -> Result<Comment, AppError> {
    let mut comment: Comment = doc.decode(collection)?;
    comment.id = doc.id.clone();
    Ok(comment)
}

/// Validates comment text: trimmed, non-empty, at most [`MAX_COMMENT_CHARS`].
pub fn validate_comment_text(text: &str) -> Result<String, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            "Comment cannot be empty",
            json!({ "field": "text" }),
        ));
    }
    let length = trimmed.chars().count();
    if length > MAX_COMMENT_CHARS {
        return Err(AppError::bad_request(
            "Comment is too long",
            json!({ "field": "text", "length": length, "max_length": MAX_COMMENT_CHARS }),
        ));
    }
    Ok(trimmed.to_string())
}

pub struct CommentService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    authors: Arc<AuthorDirectory<S>>,
}

impl<S: DocumentStore + ?Sized> CommentService<S> {
    pub fn new(store: Arc<S>, authors: Arc<AuthorDirectory<S>>) -> Self {
        Self { store, authors }
    }

    /// Lists the comments of an article, oldest first, with display names resolved.
    ///
    /// Commenter names come from one batched profile lookup. A comment whose author
    /// cannot be resolved shows the name stored on the comment, then
    /// [`ANONYMOUS`]. A failed profile lookup degrades the same way.
    pub async fn list(&self, article_id: &str) -> Result<Vec<CommentView>, AppError> {
        let article_id = require_article_id(article_id)?;
        let path = collections::comments(article_id);

        let query = Query::new().order_by(CREATED_AT_FIELD, Direction::Ascending);
        let docs = self.store.query_collection(&path, &query).await?;

        let comments: Vec<Comment> = docs
            .iter()
            .filter_map(|doc| match comment_from_document(&path, doc) {
                Ok(comment) => Some(comment),
                Err(e) => {
                    warn!("Skipping unreadable comment {}: {}", doc.id, e);
                    None
                }
            })
            .collect();

        let user_ids: Vec<String> = comments.iter().filter_map(|c| c.user_id.clone()).collect();
        let names = match self.authors.display_names(&user_ids).await {
            Ok(names) => names,
            Err(e) => {
                warn!(article_id, "commenter lookup failed: {}", e);
                Default::default()
            }
        };

        Ok(comments
            .into_iter()
            .map(|comment| {
                let name = comment
                    .user_id
                    .as_ref()
                    .and_then(|uid| names.get(uid).cloned())
                    .or_else(|| {
                        comment
                            .display_name
                            .as_deref()
                            .map(str::trim)
                            .filter(|n| !n.is_empty())
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| ANONYMOUS.to_string());
                CommentView::new(comment, name)
            })
            .collect())
    }

    /// Appends a comment by `user` and returns it as stored.
    ///
    /// The commenter's display name is stored on the comment. Callers append the
    /// returned view to their list instead of re-reading the thread.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthenticated`] without a session; nothing is written
    /// - [`AppError::Validation`] for blank or oversized text; nothing is written
    /// - [`AppError::NotFound`] when the article does not exist
    pub async fn append(
        &self,
        user: Option<&User>,
        article_id: &str,
        text: &str,
    ) -> Result<CommentView, AppError> {
        let user = require_user(user, "comment")?;
        let article_id = require_article_id(article_id)?;
        let text = validate_comment_text(text)?;

        if self
            .store
            .get_document(collections::ARTICLES, article_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(
                "Article not found",
                json!({ "id": article_id }),
            ));
        }

        let display_name = match user.display_name.clone() {
            Some(name) if !name.trim().is_empty() => Some(name),
            _ => self.authors.display_name(&user.uid).await.ok().flatten(),
        };

        let new_comment = NewComment {
            user_id: user.uid.clone(),
            display_name: display_name.clone(),
            text,
        };

        // Guarded on the article so a concurrent delete cannot leave the comment orphaned.
        let path = collections::comments(article_id);
        let id = generate_document_id();
        let batch = WriteBatch::new()
            .expect(collections::ARTICLES, article_id, Precondition::Exists)
            .expect(&path, &id, Precondition::Missing)
            .set(&path, &id, new_comment.to_document(), SetOptions::default());

        self.store.commit(batch).await.map_err(|e| match e {
            StoreError::PreconditionFailed { collection, .. } if collection == collections::ARTICLES => {
                AppError::not_found("Article not found", json!({ "id": article_id }))
            }
            other => other.into(),
        })?;

        let doc = self
            .store
            .get_document(&path, &id)
            .await?
            .ok_or_else(|| {
                AppError::internal(
                    "Comment vanished after write",
                    json!({ "article_id": article_id, "id": id }),
                )
            })?;
        let comment = comment_from_document(&path, &doc)?;

        info!(article_id, comment_id = %id, uid = %user.uid, "comment added");
        Ok(CommentView::new(
            comment,
            display_name.unwrap_or_else(|| ANONYMOUS.to_string()),
        ))
    }
}
