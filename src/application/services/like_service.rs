//! Per-user likes and the denormalized article like counter.
//!
//! Each toggle is a single atomic batch: the like record write and the counter
//! increment commit together, guarded by a precondition on the like record. Two
//! racing toggles from the same user cannot both apply; the loser re-reads the
//! authoritative state.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::services::article_service::{require_article_id, require_user};
use crate::application::services::feed_service::article_from_document;
use crate::domain::entities::{Article, Like, LikeState, LikeStatus, User};
use crate::domain::repositories::{
    DocumentStore, Precondition, SetOptions, StoreError, WriteBatch, collections,
};
use crate::error::AppError;

const LIKE_COUNT_FIELD: &str = "likeCount";

/// Stored counter versus the number of like records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeRecount {
    pub article_id: String,
    pub stored: i64,
    pub actual: i64,
}

impl LikeRecount {
    pub fn drifted(&self) -> bool {
        self.stored != self.actual
    }
}

pub struct LikeService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized> LikeService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn article(&self, article_id: &str) -> Result<Article, AppError> {
        let doc = self
            .store
            .get_document(collections::ARTICLES, article_id)
            .await?
            .ok_or_else(|| AppError::not_found("Article not found", json!({ "id": article_id })))?;
        article_from_document(&doc)
    }

    async fn state(&self, article_id: &str, uid: &str) -> Result<LikeState, AppError> {
        let record = self
            .store
            .get_document(&collections::likes(article_id), uid)
            .await?;
        Ok(LikeState::from_exists(record.is_some()))
    }

    /// Like counter of an article and whether `user` likes it.
    ///
    /// Anonymous callers always see `liked == false`.
    pub async fn status(
        &self,
        article_id: &str,
        user: Option<&User>,
    ) -> Result<LikeStatus, AppError> {
        let article_id = require_article_id(article_id)?;
        let article = self.article(article_id).await?;

        let liked = match user {
            Some(user) => self.state(article_id, &user.uid).await?.is_liked(),
            None => false,
        };

        Ok(LikeStatus {
            liked,
            like_count: article.like_count.max(0),
        })
    }

    /// Flips the like state of (`article_id`, `user`) and returns the resulting status.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthenticated`] without a session; nothing is written
    /// - [`AppError::NotFound`] when the article does not exist
    /// - [`AppError::Transport`] when the batch cannot be committed; nothing is written
    pub async fn toggle(&self, user: Option<&User>, article_id: &str) -> Result<LikeStatus, AppError> {
        let user = require_user(user, "like this article")?;
        let article_id = require_article_id(article_id)?;
        self.article(article_id).await?;

        let likes_path = collections::likes(article_id);
        let current = self.state(article_id, &user.uid).await?;

        let batch = match current {
            LikeState::NotLiked => WriteBatch::new()
                .expect(&likes_path, &user.uid, Precondition::Missing)
                .set(
                    &likes_path,
                    &user.uid,
                    Like::document_for(&user.uid),
                    SetOptions::default(),
                ),
            LikeState::Liked => WriteBatch::new()
                .expect(&likes_path, &user.uid, Precondition::Exists)
                .delete(&likes_path, &user.uid),
        }
        .increment(
            collections::ARTICLES,
            article_id,
            LIKE_COUNT_FIELD,
            current.toggle_delta(),
        );

        match self.store.commit(batch).await {
            Ok(()) => {
                info!(article_id, uid = %user.uid, liked = current.toggled().is_liked(), "like toggled");
            }
            Err(StoreError::PreconditionFailed { .. }) => {
                warn!(article_id, uid = %user.uid, "like state changed concurrently; reconciling");
            }
            Err(e) => return Err(e.into()),
        }

        self.status(article_id, Some(&user)).await
    }

    /// Compares the stored counter with the number of like records.
    pub async fn inspect(&self, article_id: &str) -> Result<LikeRecount, AppError> {
        let article_id = require_article_id(article_id)?;
        let article = self.article(article_id).await?;
        let actual = self
            .store
            .count_documents(&collections::likes(article_id))
            .await?;

        Ok(LikeRecount {
            article_id: article_id.to_string(),
            stored: article.like_count,
            actual: actual as i64,
        })
    }

    /// Rewrites the counter from the like records when they disagree.
    pub async fn recount(&self, article_id: &str) -> Result<LikeRecount, AppError> {
        let recount = self.inspect(article_id).await?;

        if recount.drifted() {
            self.store
                .update_document(
                    collections::ARTICLES,
                    &recount.article_id,
                    json!({ LIKE_COUNT_FIELD: recount.actual }),
                )
                .await?;
            info!(
                article_id = %recount.article_id,
                stored = recount.stored,
                actual = recount.actual,
                "like counter reconciled"
            );
        }

        Ok(recount)
    }
}
