//! DTOs for comment endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{CommentView, MAX_COMMENT_CHARS};

const MAX_TEXT: u64 = MAX_COMMENT_CHARS as u64;

/// Request body for `POST /api/articles/{id}/comments`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = MAX_TEXT, message = "Comment must be 1-2000 characters"))]
    pub text: String,
}

/// Response of `GET /api/articles/{id}/comments`, oldest first.
#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub count: usize,
    pub comments: Vec<CommentView>,
}

impl From<Vec<CommentView>> for CommentListResponse {
    fn from(comments: Vec<CommentView>) -> Self {
        Self {
            count: comments.len(),
            comments,
        }
    }
}
