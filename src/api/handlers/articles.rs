//! Handlers for article listing, loading and authoring endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::articles::{
    ArticleListResponse, ArticlePageResponse, ArticleResponse, CreateArticleRequest,
    UpdateArticleRequest,
};
use crate::api::dto::pagination::FeedParams;
use crate::api::middleware::CurrentUser;
use crate::application::services::FeedPage;
use crate::domain::entities::{CategoryFilter, UnknownCategory};
use crate::error::AppError;
use crate::state::AppState;

fn parse_filter(raw: Option<&str>) -> Result<CategoryFilter, AppError> {
    raw.unwrap_or_default()
        .parse()
        .map_err(|e: UnknownCategory| AppError::bad_request(e.to_string(), json!({ "field": "category" })))
}

/// Returns one page of the recent-articles feed, newest first.
///
/// # Endpoint
///
/// `GET /api/articles?category=Food&page_size=5&cursor=...`
///
/// # Query Parameters
///
/// - `category` (optional): category name or `All`
/// - `page_size` (optional): 1-50, default 5
/// - `cursor` (optional): `next_cursor` of the previous page
///
/// # Response
///
/// ```json
/// {
///   "articles": [{ "id": "A1", "title": "...", "excerpt": "...", "like_count": 3, ... }],
///   "next_cursor": "MTcwMDAwMDAwMDAwMDpBMQ"
/// }
/// ```
///
/// `next_cursor` is `null` on the last page.
///
/// # Errors
///
/// - **400 Bad Request**: unknown category, page size out of range or malformed cursor
pub async fn feed_handler(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedPage>, AppError> {
    let page_size = params
        .validated_page_size()
        .map_err(|msg| AppError::bad_request(msg, json!({ "field": "page_size" })))?;
    let filter = parse_filter(params.category.as_deref())?;

    let page = state
        .feed_service
        .recent(filter, page_size, params.cursor())
        .await?;

    Ok(Json(page))
}

/// `GET /api/articles/featured` - the two most recent articles.
pub async fn featured_handler(
    State(state): State<AppState>,
) -> Result<Json<ArticleListResponse>, AppError> {
    let articles = state.feed_service.featured().await?;
    Ok(Json(ArticleListResponse { articles }))
}

/// `GET /api/articles/trending` - the five most liked articles.
pub async fn trending_handler(
    State(state): State<AppState>,
) -> Result<Json<ArticleListResponse>, AppError> {
    let articles = state.feed_service.trending().await?;
    Ok(Json(ArticleListResponse { articles }))
}

/// `GET /api/categories/{category}/articles` - every article of a category.
pub async fn category_articles_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ArticleListResponse>, AppError> {
    let filter = parse_filter(Some(&category))?;
    let articles = state.feed_service.by_category(filter).await?;
    Ok(Json(ArticleListResponse { articles }))
}

/// Loads the article page model: the article, its author's name and related articles.
///
/// # Endpoint
///
/// `GET /api/articles/{id}`
///
/// # Response
///
/// ```json
/// {
///   "article": { "id": "A1", "title": "...", "content": "<p>...</p>", "like_count": 3, ... },
///   "author_name": "Ada",
///   "related": [{ "id": "A7", "title": "...", ... }]
/// }
/// ```
///
/// # Errors
///
/// - **404 Not Found**: no article has this id
/// - **503 Service Unavailable**: the document store is unreachable
pub async fn get_article_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticlePageResponse>, AppError> {
    let view = state.article_service.load(&id).await?;
    Ok(Json(view.into()))
}

/// Publishes a new article authored by the session user.
///
/// # Endpoint
///
/// `POST /api/articles`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Sourdough at home",
///   "subtitle": "optional",
///   "category": "Food",
///   "content": "<p>...</p>",
///   "cover_image": "https://cdn.example.com/bread.png"
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: missing title/content, unknown category or bad cover URL
/// - **401 Unauthorized**: no session
pub async fn create_article_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), AppError> {
    payload.validate()?;

    let article = state
        .article_service
        .publish(user.user(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(article.into())))
}

/// Partially updates an article. Only its author may edit it.
///
/// # Endpoint
///
/// `PATCH /api/articles/{id}`
///
/// # Errors
///
/// - **400 Bad Request**: invalid fields or an empty patch
/// - **401 Unauthorized**: no session
/// - **403 Forbidden**: the session user is not the author
/// - **404 Not Found**: no article has this id
pub async fn update_article_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<Json<ArticleResponse>, AppError> {
    payload.validate()?;

    let article = state
        .article_service
        .edit(user.user(), &id, payload.into())
        .await?;

    Ok(Json(article.into()))
}

/// Deletes an article with its comments and likes. Only its author may delete it.
///
/// # Endpoint
///
/// `DELETE /api/articles/{id}`
///
/// # Response
///
/// **204 No Content** on success.
pub async fn delete_article_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<StatusCode, AppError> {
    state.article_service.delete(user.user(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
