//! API route configuration.
//!
//! Every API route passes through [`crate::api::middleware::auth`], which resolves
//! an optional bearer session. Operations that need a session reject anonymous
//! callers themselves.

use crate::api::handlers::{
    category_articles_handler, create_article_handler, create_comment_handler,
    delete_article_handler, featured_handler, feed_handler, get_article_handler,
    like_status_handler, list_comments_handler, me_handler, toggle_like_handler,
    trending_handler, update_article_handler, upload_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `GET    /me`                             - Current session user
/// - `GET    /articles`                       - Recent-articles feed (paged)
/// - `POST   /articles`                       - Publish an article
/// - `GET    /articles/featured`              - Two most recent articles
/// - `GET    /articles/trending`              - Five most liked articles
/// - `GET    /articles/{id}`                  - Article page model
/// - `PATCH  /articles/{id}`                  - Edit an article (author only)
/// - `DELETE /articles/{id}`                  - Delete an article (author only)
/// - `GET    /articles/{id}/comments`         - Comment thread
/// - `POST   /articles/{id}/comments`         - Add a comment
/// - `GET    /articles/{id}/like`             - Like status
/// - `POST   /articles/{id}/like`             - Toggle like
/// - `GET    /categories/{category}/articles` - Category listing
/// - `POST   /uploads?name=`                  - Upload a cover image
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/me", get(me_handler))
        .route("/articles", get(feed_handler).post(create_article_handler))
        .route("/articles/featured", get(featured_handler))
        .route("/articles/trending", get(trending_handler))
        .route(
            "/articles/{id}",
            get(get_article_handler)
                .patch(update_article_handler)
                .delete(delete_article_handler),
        )
        .route(
            "/articles/{id}/comments",
            get(list_comments_handler).post(create_comment_handler),
        )
        .route(
            "/articles/{id}/like",
            get(like_status_handler).post(toggle_like_handler),
        )
        .route(
            "/categories/{category}/articles",
            get(category_articles_handler),
        )
        .route(
            "/uploads",
            post(upload_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
