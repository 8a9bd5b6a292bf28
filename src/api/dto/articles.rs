//! DTOs for article endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{ArticleChanges, ArticleInput, ArticleView};
use crate::domain::entities::{Article, ArticleSummary};

/// Request body for `POST /api/articles`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub subtitle: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[validate(length(max = 2048))]
    pub cover_image: Option<String>,
}

impl From<CreateArticleRequest> for ArticleInput {
    fn from(req: CreateArticleRequest) -> Self {
        Self {
            title: req.title,
            subtitle: req.subtitle,
            category: req.category,
            content: req.content,
            cover_image: req.cover_image,
        }
    }
}

/// Request body for `PATCH /api/articles/{id}`.
///
/// Only provided fields change. `cover_image: null` removes the cover.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 500))]
    pub subtitle: Option<String>,

    pub category: Option<String>,

    pub content: Option<String>,

    /// Absent = no change, null = clear, value = set.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub cover_image: Option<Option<String>>,
}

impl From<UpdateArticleRequest> for ArticleChanges {
    fn from(req: UpdateArticleRequest) -> Self {
        Self {
            title: req.title,
            subtitle: req.subtitle,
            category: req.category,
            content: req.content,
            cover_image: req.cover_image.map(Option::unwrap_or_default),
        }
    }
}

/// JSON representation of a full article.
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub category: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        let cover_image = article.cover_url().map(str::to_string);
        Self {
            id: article.id,
            title: article.title,
            subtitle: article.subtitle,
            category: article.category,
            content: article.content,
            cover_image,
            author_id: article.author_id,
            created_at: article.created_at,
            like_count: article.like_count.max(0),
        }
    }
}

/// Response of `GET /api/articles/{id}`.
///
/// `related` is `null` when the related panel could not be loaded.
#[derive(Debug, Serialize)]
pub struct ArticlePageResponse {
    pub article: ArticleResponse,
    pub author_name: String,
    pub related: Option<Vec<ArticleSummary>>,
}

impl From<ArticleView> for ArticlePageResponse {
    fn from(view: ArticleView) -> Self {
        Self {
            article: view.article.into(),
            author_name: view.author_name,
            related: view.related,
        }
    }
}

/// A list of article cards.
#[derive(Debug, Serialize)]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_image_double_option() {
        let absent: UpdateArticleRequest = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(ArticleChanges::from(absent).cover_image, None);

        let cleared: UpdateArticleRequest =
            serde_json::from_str(r#"{"cover_image": null}"#).unwrap();
        assert_eq!(ArticleChanges::from(cleared).cover_image.as_deref(), Some(""));

        let set: UpdateArticleRequest =
            serde_json::from_str(r#"{"cover_image": "https://cdn.example.com/a.png"}"#).unwrap();
        assert_eq!(
            ArticleChanges::from(set).cover_image.as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateArticleRequest = serde_json::from_str(
            r#"{"title": "", "category": "Food", "content": "<p>x</p>"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());

        let req: CreateArticleRequest = serde_json::from_str(
            r#"{"title": "Soup", "category": "Food", "content": "<p>x</p>"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.subtitle.is_empty());
    }
}
