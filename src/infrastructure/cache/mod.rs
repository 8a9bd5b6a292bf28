//! Caching layer for author display names.
//!
//! Provides an [`AuthorCache`] trait with three implementations:
//! - [`RedisCache`] - shared Redis-backed cache
//! - [`MemoryCache`] - per-process cache used when Redis is not configured
//! - [`NullCache`] - no-op implementation for testing/disabled caching

mod author_cache;
mod memory_cache;
mod null_cache;
mod redis_cache;

pub use author_cache::{AuthorCache, CacheError, CacheResult};
pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;

#[cfg(test)]
pub use author_cache::MockAuthorCache;
