//! No-op cache implementation for testing or disabled caching.

use super::author_cache::{AuthorCache, CacheResult};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Every lookup is a miss, so author names are always read from the store.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (author caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorCache for NullCache {
    async fn get_name(&self, _author_id: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_name(&self, _author_id: &str, _name: &str, _ttl: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _author_id: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
