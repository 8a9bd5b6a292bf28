//! Handlers for the like control of an article.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::likes::LikeResponse;
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/articles/{id}/like` - like count, and whether the caller likes it.
///
/// Anonymous callers always get `"liked": false`.
pub async fn like_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Json<LikeResponse>, AppError> {
    let status = state.like_service.status(&id, user.user()).await?;
    Ok(Json(LikeResponse::new(id.trim(), status)))
}

/// Likes or unlikes an article for the session user.
///
/// # Endpoint
///
/// `POST /api/articles/{id}/like`
///
/// # Response
///
/// The authoritative state after the toggle:
///
/// ```json
/// { "article_id": "A1", "liked": true, "like_count": 4 }
/// ```
///
/// # Errors
///
/// - **401 Unauthorized**: no session; nothing is written
/// - **404 Not Found**: no article has this id
/// - **503 Service Unavailable**: the write failed; nothing is written
pub async fn toggle_like_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Json<LikeResponse>, AppError> {
    let status = state.like_service.toggle(user.user(), &id).await?;
    Ok(Json(LikeResponse::new(id.trim(), status)))
}
