//! Liveness probe for the document store and the author cache.

use axum::{Json, extract::State, http::StatusCode};
use std::time::Instant;
use tracing::warn;

use crate::api::dto::health::{ComponentCheck, HealthChecks, HealthResponse, ServiceStatus};
use crate::state::AppState;

/// Probes both backends concurrently.
///
/// # Endpoint
///
/// `GET /health`
///
/// Answers **200** when every backend responds and **503** otherwise, with the same
/// body either way:
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "latency_ms": 2 },
///     "cache": { "status": "ok", "latency_ms": 0 }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (store, cache) = tokio::join!(probe_store(&state), probe_cache(&state));
    let checks = HealthChecks { store, cache };
    let status = checks.overall();

    let code = match status {
        ServiceStatus::Healthy => StatusCode::OK,
        ServiceStatus::Degraded => {
            warn!(?checks, "health check degraded");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }),
    )
}

async fn probe_store(state: &AppState) -> ComponentCheck {
    let started = Instant::now();
    let result = state.store.ping().await;
    let elapsed = started.elapsed().as_millis() as u64;

    match result {
        Ok(()) => ComponentCheck::passed(elapsed),
        Err(e) => ComponentCheck::failed(elapsed, e.to_string()),
    }
}

async fn probe_cache(state: &AppState) -> ComponentCheck {
    let started = Instant::now();
    let reachable = state.cache.health_check().await;
    let elapsed = started.elapsed().as_millis() as u64;

    if reachable {
        ComponentCheck::passed(elapsed)
    } else {
        ComponentCheck::failed(elapsed, "author cache unreachable")
    }
}
