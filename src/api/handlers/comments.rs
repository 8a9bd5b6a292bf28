//! Handlers for the comment thread of an article.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::comments::{CommentListResponse, CreateCommentRequest};
use crate::api::middleware::CurrentUser;
use crate::domain::entities::CommentView;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the comments of an article, oldest first.
///
/// # Endpoint
///
/// `GET /api/articles/{id}/comments`
///
/// # Response
///
/// ```json
/// {
///   "count": 1,
///   "comments": [
///     { "id": "c1", "user_id": "U1", "display_name": "Ada", "text": "Great read!", "created_at": "..." }
///   ]
/// }
/// ```
pub async fn list_comments_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommentListResponse>, AppError> {
    let comments = state.comment_service.list(&id).await?;
    Ok(Json(comments.into()))
}

/// Appends a comment by the session user and returns it as stored.
///
/// # Endpoint
///
/// `POST /api/articles/{id}/comments`
///
/// # Request Body
///
/// ```json
/// { "text": "Great read!" }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: blank or oversized text
/// - **401 Unauthorized**: no session
/// - **404 Not Found**: no article has this id
pub async fn create_comment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: CurrentUser,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    payload.validate()?;

    let comment = state
        .comment_service
        .append(user.user(), &id, &payload.text)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
