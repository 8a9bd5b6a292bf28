//! HTTP server initialization and runtime setup.
//!
//! Builds the document store, author cache and asset storage from [`Config`],
//! wires them into [`AppState`] and runs the Axum server until a shutdown signal.

use crate::config::{Config, StoreBackend};
use crate::domain::repositories::DocumentStore;
use crate::infrastructure::cache::{AuthorCache, MemoryCache, RedisCache};
use crate::infrastructure::persistence::{MemoryDocumentStore, PgDocumentStore, TimeoutStore};
use crate::infrastructure::storage::LocalAssetStorage;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Attempts made to reach PostgreSQL at startup.
const CONNECT_ATTEMPTS: usize = 5;

/// Delays between connection attempts: jittered, exponential, capped at 5s.
fn connect_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(200)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(CONNECT_ATTEMPTS - 1)
}

/// Opens the PostgreSQL pool, retrying with jittered exponential backoff.
pub async fn connect_postgres(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;

    let pool = Retry::start(connect_backoff(), || async {
        PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .connect(url)
            .await
            .inspect_err(|e| tracing::warn!("Database connection attempt failed: {}", e))
    })
    .await
    .context("Failed to connect to database")?;

    Ok(pool)
}

/// Builds the configured document store wrapped in the per-call timeout.
pub async fn build_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    let inner: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory document store; data is lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
        StoreBackend::Postgres => {
            let pool = connect_postgres(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            Arc::new(PgDocumentStore::new(Arc::new(pool)))
        }
    };

    Ok(Arc::new(TimeoutStore::new(inner, config.store_timeout())))
}

/// Redis when configured and reachable, the in-process cache otherwise.
pub async fn build_cache(config: &Config) -> Arc<dyn AuthorCache> {
    let ttl = config.author_cache_ttl_seconds;

    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, ttl).await {
            Ok(redis) => {
                tracing::info!("Author cache enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
            }
        }
    } else {
        tracing::info!("Author cache: in-process");
    }

    Arc::new(MemoryCache::new(ttl))
}

/// Builds the application state from configuration.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let store = build_store(config).await?;
    let cache = build_cache(config).await;
    let assets = Arc::new(LocalAssetStorage::new(
        &config.upload_dir,
        &config.public_base_url,
    ));

    Ok(AppState::new(
        store,
        cache,
        assets,
        config.session_signing_secret.clone(),
        config.max_upload_bytes,
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The document store cannot be reached or migrated
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(state, Path::new(&config.upload_dir));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_backoff_is_bounded() {
        let delays: Vec<Duration> = connect_backoff().collect();
        assert_eq!(delays.len(), CONNECT_ATTEMPTS - 1);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(5)));
    }
}
