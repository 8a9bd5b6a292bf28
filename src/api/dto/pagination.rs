//! Feed paging query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::feed_service::{FEED_PAGE_SIZE, MAX_FEED_PAGE_SIZE};

/// Query parameters of `GET /api/articles`.
///
/// Uses `serde_with` to parse the page size from the query string as an integer.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    /// Category name or `All`; absent means all categories.
    #[serde(default)]
    pub category: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<usize>,

    /// `next_cursor` of the previous page.
    #[serde(default)]
    pub cursor: Option<String>,
}

impl FeedParams {
    /// Validates the page size.
    ///
    /// # Defaults
    ///
    /// - `page_size`: [`FEED_PAGE_SIZE`]
    ///
    /// # Validation
    ///
    /// - Page size must be between 1 and [`MAX_FEED_PAGE_SIZE`]
    pub fn validated_page_size(&self) -> Result<usize, String> {
        let page_size = self.page_size.unwrap_or(FEED_PAGE_SIZE);

        if !(1..=MAX_FEED_PAGE_SIZE).contains(&page_size) {
            return Err(format!(
                "Page size must be between 1 and {}",
                MAX_FEED_PAGE_SIZE
            ));
        }

        Ok(page_size)
    }

    /// Cursor with blank values treated as absent.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}
