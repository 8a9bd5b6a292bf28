//! DTOs for like endpoints.

use serde::Serialize;

use crate::domain::entities::LikeStatus;

/// Like control state of one article for the caller.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub article_id: String,
    pub liked: bool,
    pub like_count: i64,
}

impl LikeResponse {
    pub fn new(article_id: impl Into<String>, status: LikeStatus) -> Self {
        Self {
            article_id: article_id.into(),
            liked: status.liked,
            like_count: status.like_count,
        }
    }
}
