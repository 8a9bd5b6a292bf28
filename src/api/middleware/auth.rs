//! Bearer session middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use std::convert::Infallible;

use crate::{domain::entities::User, error::AppError, state::AppState};

/// Resolves an optional bearer session token to the signed-in [`User`].
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <session token>
/// ```
///
/// # Authentication Flow
///
/// 1. No `Authorization` header: the request continues anonymously
/// 2. Extract the token and resolve it against the `sessions` collection
/// 3. Store the [`User`] in request extensions for [`CurrentUser`]
///
/// Whether an operation needs a session is decided by the services, which reject
/// anonymous mutations with `Unauthenticated`.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is malformed or the token is unknown
/// or revoked, and `503 Service Unavailable` if the session store is unreachable.
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !req.headers().contains_key(header::AUTHORIZATION) {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthenticated(
                "Unauthenticated",
                serde_json::json!({"reason": "Authorization header is invalid"}),
            )
        })?;

    let user = st.auth_service.authenticate(&token).await?;
    tracing::debug!(uid = %user.uid, "request authenticated");
    parts.extensions.insert(user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// The session user of the request, if any.
///
/// Populated by [`layer`]; always `None` on routes without it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<User>().cloned()))
    }
}
