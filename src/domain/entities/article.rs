//! Article entity and its write-side shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domain::entities::Category;
use crate::domain::repositories::server_timestamp;
use crate::utils::text::{excerpt, strip_html};

/// Maximum number of characters kept in a summary excerpt.
pub const EXCERPT_CHARS: usize = 190;

/// Maximum number of title characters shown on a card.
pub const CARD_TITLE_CHARS: usize = 90;

/// A published article as stored in the `articles` collection.
///
/// `like_count` is a denormalized counter of the article's `likes` subcollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub category: String,
    /// Serialized rich-text markup.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: i64,
}

impl Article {
    /// Cover image URL, treating blank strings as absent.
    pub fn cover_url(&self) -> Option<&str> {
        self.cover_image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_authored_by(&self, uid: &str) -> bool {
        self.author_id.as_deref() == Some(uid)
    }

    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id.clone(),
            title: excerpt(&self.title, CARD_TITLE_CHARS),
            category: self.category.clone(),
            excerpt: excerpt(&strip_html(&self.content), EXCERPT_CHARS),
            cover_image: self.cover_url().map(str::to_string),
            created_at: self.created_at,
            like_count: self.like_count,
        }
    }
}

/// Card-sized projection of an article for feeds and related-article panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
}

/// Input data for publishing a new article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub subtitle: String,
    pub category: Category,
    pub content: String,
    pub cover_image: Option<String>,
    pub author_id: String,
}

impl NewArticle {
    /// Document body with a zeroed like counter and a server-assigned timestamp.
    pub fn to_document(&self) -> Value {
        json!({
            "title": self.title,
            "subtitle": self.subtitle,
            "category": self.category.as_str(),
            "content": self.content,
            "coverImage": self.cover_image,
            "authorId": self.author_id,
            "timestamp": server_timestamp(),
            "likeCount": 0,
        })
    }
}

/// Partial update for an existing article.
///
/// `None` fields are left unchanged. `cover_image: Some(None)` clears the cover.
#[derive(Debug, Clone, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub category: Option<Category>,
    pub content: Option<String>,
    pub cover_image: Option<Option<String>>,
}

impl ArticlePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.category.is_none()
            && self.content.is_none()
            && self.cover_image.is_none()
    }

    /// Patch body; every edit also refreshes the article timestamp.
    pub fn to_document(&self) -> Value {
        let mut fields = Map::new();
        if let Some(title) = &self.title {
            fields.insert("title".into(), json!(title));
        }
        if let Some(subtitle) = &self.subtitle {
            fields.insert("subtitle".into(), json!(subtitle));
        }
        if let Some(category) = &self.category {
            fields.insert("category".into(), json!(category.as_str()));
        }
        if let Some(content) = &self.content {
            fields.insert("content".into(), json!(content));
        }
        if let Some(cover) = &self.cover_image {
            fields.insert("coverImage".into(), json!(cover));
        }
        fields.insert("timestamp".into(), server_timestamp());
        Value::Object(fields)
    }
}
