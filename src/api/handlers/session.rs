//! Handler for the current session.

use axum::Json;
use serde_json::json;

use crate::api::middleware::CurrentUser;
use crate::domain::entities::User;
use crate::error::AppError;

/// `GET /api/me` - the user the bearer token belongs to.
///
/// Responds **401 Unauthorized** without a session.
pub async fn me_handler(user: CurrentUser) -> Result<Json<User>, AppError> {
    user.0.map(Json).ok_or_else(|| {
        AppError::unauthenticated(
            "Unauthenticated",
            json!({ "reason": "No session token supplied" }),
        )
    })
}
