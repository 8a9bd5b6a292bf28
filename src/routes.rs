//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: document store and author cache (public)
//! - `/api/*`            - REST API (optional bearer session)
//! - `/uploads/*`        - Uploaded cover images
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer session resolution on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use std::path::Path;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Builds the router without path normalization.
///
/// `upload_dir` is served under `/uploads`.
pub fn build_router(state: AppState, upload_dir: &Path) -> Router {
    let api_router = api::routes::routes(state.max_upload_bytes)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing.
pub fn app_router(state: AppState, upload_dir: &Path) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, upload_dir))
}
