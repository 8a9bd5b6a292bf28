//! Author profile stored in the `users` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name substituted when an article's author cannot be resolved.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Display name substituted when a commenter cannot be resolved.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Author {
    /// Stored display name, ignoring blank values.
    pub fn name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
