//! In-process author cache with per-entry expiry.

use super::author_cache::{AuthorCache, CacheResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

struct Entry {
    name: String,
    expires_at: Instant,
}

/// Author name cache local to one process.
///
/// Used when no Redis is configured. Expired entries are dropped lazily on read.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl_seconds: u64) -> Self {
        debug!("Using MemoryCache (TTL: {}s)", default_ttl_seconds);
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl AuthorCache for MemoryCache {
    async fn get_name(&self, author_id: &str) -> CacheResult<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(author_id) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    debug!("Cache HIT: author {}", author_id);
                    return Ok(Some(entry.name.clone()));
                }
                Some(_) => {}
                None => {
                    debug!("Cache MISS: author {}", author_id);
                    return Ok(None);
                }
            }
        }

        // Expired: drop it so the map does not grow with stale authors.
        self.entries.write().await.remove(author_id);
        debug!("Cache EXPIRED: author {}", author_id);
        Ok(None)
    }

    async fn set_name(&self, author_id: &str, name: &str, ttl: Option<u64>) -> CacheResult<()> {
        let ttl = ttl.map(Duration::from_secs).unwrap_or(self.default_ttl);
        self.entries.write().await.insert(
            author_id.to_string(),
            Entry {
                name: name.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn invalidate(&self, author_id: &str) -> CacheResult<()> {
        self.entries.write().await.remove(author_id);
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.entries.write().await.clear();
        debug!("Cache CLEAR");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_after_set() {
        let cache = MemoryCache::new(60);
        cache.set_name("U1", "Ada", None).await.unwrap();

        assert_eq!(cache.get_name("U1").await.unwrap(), Some("Ada".to_string()));
        assert_eq!(cache.get_name("U2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let cache = MemoryCache::new(60);
        cache.set_name("U1", "Ada", Some(0)).await.unwrap();

        assert_eq!(cache.get_name("U1").await.unwrap(), None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = MemoryCache::new(60);
        cache.set_name("U1", "Ada", None).await.unwrap();
        cache.set_name("U2", "Grace", None).await.unwrap();

        cache.invalidate("U1").await.unwrap();
        assert_eq!(cache.get_name("U1").await.unwrap(), None);
        assert_eq!(cache.len().await, 1);

        cache.clear().await.unwrap();
        assert_eq!(cache.len().await, 0);
    }
}
