//! Handler for cover image uploads.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::uploads::{UploadParams, UploadResponse};
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Stores the raw request body as a cover image.
///
/// # Endpoint
///
/// `POST /api/uploads?name=bread.png`
///
/// The body is the file content. The response carries the public URL to put in an
/// article's `cover_image`:
///
/// ```json
/// { "url": "http://localhost:3000/uploads/covers/1700000000000_bread.png" }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: empty body or unusable file name
/// - **401 Unauthorized**: no session
/// - **413 Payload Too Large**: body above `MAX_UPLOAD_BYTES`
pub async fn upload_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    params.validate()?;

    let url = state
        .article_service
        .upload_cover(user.user(), &params.name, body.to_vec())
        .await?;

    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}
