//! Collection paths used by the blog.

pub const ARTICLES: &str = "articles";
pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";

/// Comments subcollection of an article.
pub fn comments(article_id: &str) -> String {
    format!("{ARTICLES}/{article_id}/comments")
}

/// Likes subcollection of an article, keyed by user id.
pub fn likes(article_id: &str) -> String {
    format!("{ARTICLES}/{article_id}/likes")
}
