//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod articles;
pub mod comments;
pub mod health;
pub mod likes;
pub mod session;
pub mod uploads;

pub use articles::{
    category_articles_handler, create_article_handler, delete_article_handler,
    featured_handler, feed_handler, get_article_handler, trending_handler,
    update_article_handler,
};
pub use comments::{create_comment_handler, list_comments_handler};
pub use health::health_handler;
pub use likes::{like_status_handler, toggle_like_handler};
pub use session::me_handler;
pub use uploads::upload_handler;
