//! Article listings: recent feed, featured, trending, category and related articles.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::{Article, ArticleSummary, CategoryFilter};
use crate::domain::repositories::{Cursor, Direction, Document, DocumentStore, Query, collections};
use crate::error::AppError;

/// Default number of articles per feed page.
pub const FEED_PAGE_SIZE: usize = 5;
pub const MAX_FEED_PAGE_SIZE: usize = 50;
pub const FEATURED_COUNT: usize = 2;
pub const TRENDING_COUNT: usize = 5;
pub const RELATED_COUNT: usize = 5;

const TIMESTAMP_FIELD: &str = "timestamp";
const LIKE_COUNT_FIELD: &str = "likeCount";

/// Opaque "load more" position: timestamp and id of the last article shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCursor {
    pub timestamp_ms: i64,
    pub id: String,
}

impl FeedCursor {
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}:{}", self.timestamp_ms, self.id))
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for anything not produced by [`FeedCursor::encode`].
    pub fn decode(raw: &str) -> Result<Self, AppError> {
        let invalid = || AppError::bad_request("Invalid feed cursor", json!({ "cursor": raw }));

        let bytes = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid())?;
        let text = String::from_utf8(bytes).map_err(|_| invalid())?;
        let (ts, id) = text.split_once(':').ok_or_else(invalid)?;
        let timestamp_ms = ts.parse().map_err(|_| invalid())?;

        if id.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            timestamp_ms,
            id: id.to_string(),
        })
    }
}

/// One page of the recent-articles feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPage {
    pub articles: Vec<ArticleSummary>,
    pub next_cursor: Option<String>,
}

/// Decodes an article document, attaching its id.
pub(crate) fn article_from_document(doc: &Document) -> Result<Article, AppError> {
    let mut article: Article = doc.decode(collections::ARTICLES)?;
    article.id = doc.id.clone();
    Ok(article)
}

/// Decodes a listing, skipping documents that are not readable articles.
fn summaries(docs: Vec<Document>) -> Vec<Article> {
    docs.iter()
        .filter_map(|doc| match article_from_document(doc) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!("Skipping unreadable article {}: {}", doc.id, e);
                None
            }
        })
        .collect()
}

pub struct FeedService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized> FeedService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn recency_query(filter: CategoryFilter) -> Query {
        let query = Query::new().order_by(TIMESTAMP_FIELD, Direction::Descending);
        match filter.category() {
            Some(category) => query.where_eq("category", category.as_str()),
            None => query,
        }
    }

    /// Newest articles first, `page_size` at a time.
    ///
    /// `cursor` is the `next_cursor` of the previous page. `page_size` is clamped to
    /// `1..=MAX_FEED_PAGE_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed cursor and
    /// [`AppError::Transport`] when the store read fails.
    pub async fn recent(
        &self,
        filter: CategoryFilter,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<FeedPage, AppError> {
        let page_size = page_size.clamp(1, MAX_FEED_PAGE_SIZE);

        let mut query = Self::recency_query(filter).limit(page_size + 1);
        if let Some(raw) = cursor {
            let cursor = FeedCursor::decode(raw)?;
            query = query.start_after(Cursor {
                value: Value::from(cursor.timestamp_ms),
                id: cursor.id,
            });
        }

        let docs = self
            .store
            .query_collection(collections::ARTICLES, &query)
            .await?;
        let has_more = docs.len() > page_size;

        let mut articles = summaries(docs);
        articles.truncate(page_size);

        let next_cursor = match articles.last() {
            Some(last) if has_more => Some(
                FeedCursor {
                    timestamp_ms: last.created_at.timestamp_millis(),
                    id: last.id.clone(),
                }
                .encode(),
            ),
            _ => None,
        };

        Ok(FeedPage {
            articles: articles.iter().map(Article::summary).collect(),
            next_cursor,
        })
    }

    /// The most recent articles, for the hero section.
    pub async fn featured(&self) -> Result<Vec<ArticleSummary>, AppError> {
        let page = self
            .recent(CategoryFilter::All, FEATURED_COUNT, None)
            .await?;
        Ok(page.articles)
    }

    /// Most liked articles.
    pub async fn trending(&self) -> Result<Vec<ArticleSummary>, AppError> {
        let query = Query::new()
            .order_by(LIKE_COUNT_FIELD, Direction::Descending)
            .limit(TRENDING_COUNT);

        let docs = self
            .store
            .query_collection(collections::ARTICLES, &query)
            .await?;
        Ok(summaries(docs).iter().map(Article::summary).collect())
    }

    /// Every article of a category, newest first; `All` lists everything.
    pub async fn by_category(&self, filter: CategoryFilter) -> Result<Vec<ArticleSummary>, AppError> {
        let docs = self
            .store
            .query_collection(collections::ARTICLES, &Self::recency_query(filter))
            .await?;
        Ok(summaries(docs).iter().map(Article::summary).collect())
    }

    /// Up to [`RELATED_COUNT`] other articles sharing `category`, newest first.
    ///
    /// One extra article is fetched so that excluding `exclude_id` still fills the panel.
    pub async fn related(
        &self,
        category: &str,
        exclude_id: &str,
    ) -> Result<Vec<ArticleSummary>, AppError> {
        let query = Query::new()
            .where_eq("category", category)
            .order_by(TIMESTAMP_FIELD, Direction::Descending)
            .limit(RELATED_COUNT + 1);

        let docs = self
            .store
            .query_collection(collections::ARTICLES, &query)
            .await?;

        Ok(summaries(docs)
            .iter()
            .filter(|article| article.id != exclude_id)
            .take(RELATED_COUNT)
            .map(Article::summary)
            .collect())
    }
}
