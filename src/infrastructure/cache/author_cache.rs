//! Author display-name cache contract.

use async_trait::async_trait;

/// Failure reaching a cache backend. Callers log it and fall back to the store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    ConnectionError(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Short-lived memo of author display names keyed by author id.
///
/// Implementations must be thread-safe and fail open: a cache error is logged and
/// treated as a miss so lookups fall through to the document store.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - shared Redis cache with TTL
/// - [`crate::infrastructure::cache::MemoryCache`] - per-process cache with TTL
/// - [`crate::infrastructure::cache::NullCache`] - no-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorCache: Send + Sync {
    /// Returns the cached display name for `author_id`.
    ///
    /// - `Ok(Some(name))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_name(&self, author_id: &str) -> CacheResult<Option<String>>;

    /// Stores a display name, using the implementation's default TTL when `ttl_seconds` is `None`.
    async fn set_name(&self, author_id: &str, name: &str, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Removes one cached entry. Used when a profile changes.
    async fn invalidate(&self, author_id: &str) -> CacheResult<()>;

    /// Drops every cached entry. Used by the admin CLI after bulk profile edits.
    async fn clear(&self) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
