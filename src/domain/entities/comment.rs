//! Comment entity stored under `articles/{id}/comments`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::repositories::server_timestamp;

/// Upper bound on comment length, in characters.
pub const MAX_COMMENT_CHARS: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Commenter name captured at write time; older comments may lack it.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "comment")]
    pub text: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// A comment with its commenter name resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub id: String,
    pub user_id: Option<String>,
    pub display_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, display_name: String) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            display_name,
            text: comment.text,
            created_at: comment.created_at,
        }
    }

    /// Avatar initial: first character of the display name, uppercased.
    pub fn initial(&self) -> Option<char> {
        self.display_name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }
}

/// Input data for appending a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: String,
    pub display_name: Option<String>,
    pub text: String,
}

impl NewComment {
    pub fn to_document(&self) -> Value {
        json!({
            "userId": self.user_id,
            "displayName": self.display_name,
            "comment": self.text,
            "createdAt": server_timestamp(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_legacy_comment_without_display_name() {
        let comment: Comment = serde_json::from_value(json!({
            "userId": "U1",
            "comment": "Nice",
            "createdAt": 1_700_000_000_000i64,
        }))
        .unwrap();

        assert_eq!(comment.text, "Nice");
        assert!(comment.display_name.is_none());
    }

    #[test]
    fn test_view_initial() {
        let comment: Comment = serde_json::from_value(json!({
            "comment": "x",
            "createdAt": 0,
        }))
        .unwrap();

        let view = CommentView::new(comment, "émile".to_string());
        assert_eq!(view.initial(), Some('É'));
    }

    #[test]
    fn test_new_comment_document() {
        let doc = NewComment {
            user_id: "U1".to_string(),
            display_name: Some("Ada".to_string()),
            text: "Great read!".to_string(),
        }
        .to_document();

        assert_eq!(doc["userId"], "U1");
        assert_eq!(doc["comment"], "Great read!");
        assert_eq!(doc["createdAt"], server_timestamp());
    }
}
