//! Like records and per-user like state.

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::server_timestamp;

/// A like record stored at `articles/{article_id}/likes/{user_id}`.
///
/// Holds `userId` and a server-assigned `likedAt`; only its existence is read back.
pub struct Like;

impl Like {
    pub fn document_for(user_id: &str) -> Value {
        json!({
            "userId": user_id,
            "likedAt": server_timestamp(),
        })
    }
}

/// Like state of one (article, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    NotLiked,
    Liked,
}

impl LikeState {
    pub fn from_exists(exists: bool) -> Self {
        if exists { Self::Liked } else { Self::NotLiked }
    }

    pub fn is_liked(self) -> bool {
        self == Self::Liked
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::NotLiked => Self::Liked,
            Self::Liked => Self::NotLiked,
        }
    }

    /// Counter change applied when leaving this state.
    pub fn toggle_delta(self) -> i64 {
        match self {
            Self::NotLiked => 1,
            Self::Liked => -1,
        }
    }
}

/// Like state as shown next to the like control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: i64,
}

impl LikeStatus {
    /// Local state after an optimistic toggle, before the store confirms it.
    pub fn optimistic_toggle(self) -> Self {
        let delta = LikeState::from_exists(self.liked).toggle_delta();
        Self {
            liked: !self.liked,
            like_count: (self.like_count + delta).max(0),
        }
    }
}
