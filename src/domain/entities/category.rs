//! Article categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Entertainment,
    Lifestyle,
    Religion,
    Health,
    Food,
    Politics,
    Relationship,
    Technology,
    Education,
    Family,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Entertainment,
        Category::Lifestyle,
        Category::Religion,
        Category::Health,
        Category::Food,
        Category::Politics,
        Category::Relationship,
        Category::Technology,
        Category::Education,
        Category::Family,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Entertainment => "Entertainment",
            Category::Lifestyle => "Lifestyle",
            Category::Religion => "Religion",
            Category::Health => "Health",
            Category::Food => "Food",
            Category::Politics => "Politics",
            Category::Relationship => "Relationship",
            Category::Technology => "Technology",
            Category::Education => "Education",
            Category::Family => "Family",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive match on the category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Category selection for listings; `All` disables filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(c) => Some(*c),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        trimmed.parse().map(CategoryFilter::Only)
    }
}
