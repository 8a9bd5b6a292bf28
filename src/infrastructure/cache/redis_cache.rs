//! Redis-backed author cache.

use super::author_cache::{AuthorCache, CacheError, CacheResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Keys requested per SCAN round trip in [`AuthorCache::clear`].
const SCAN_BATCH: usize = 500;

/// Redis cache shared by every server instance.
///
/// Uses `ConnectionManager` for connection reuse. All operations are fail-open:
/// errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// `default_ttl_seconds` applies when [`AuthorCache::set_name`] is called without
    /// a TTL; controlled via `AUTHOR_CACHE_TTL_SECONDS`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "author:".to_string(),
        })
    }

    fn build_key(&self, author_id: &str) -> String {
        format!("{}{}", self.key_prefix, author_id)
    }
}

#[async_trait]
impl AuthorCache for RedisCache {
    async fn get_name(&self, author_id: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(author_id);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(name)) => {
                debug!("Cache HIT: author {}", author_id);
                Ok(Some(name))
            }
            Ok(None) => {
                debug!("Cache MISS: author {}", author_id);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for author {}: {}", author_id, e);
                Ok(None)
            }
        }
    }

    async fn set_name(&self, author_id: &str, name: &str, ttl: Option<u64>) -> CacheResult<()> {
        let key = self.build_key(author_id);
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.unwrap_or(self.default_ttl);

        if let Err(e) = conn.set_ex::<_, _, ()>(&key, name, ttl_seconds).await {
            warn!("Redis SET error for author {}: {}", author_id, e);
        } else {
            debug!("Cache SET: author {} (TTL: {}s)", author_id, ttl_seconds);
        }
        Ok(())
    }

    async fn invalidate(&self, author_id: &str) -> CacheResult<()> {
        let key = self.build_key(author_id);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: author {}", author_id);
                }
            }
            Err(e) => warn!("Redis DEL error for author {}: {}", author_id, e),
        }
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed: i64 = 0;

        // Cursor 0 both starts and ends the walk.
        loop {
            let (next, keys): (u64, Vec<String>) = match redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!("Redis SCAN error for {}: {}", pattern, e);
                    return Ok(());
                }
            };

            if !keys.is_empty() {
                match conn.del::<_, i64>(keys).await {
                    Ok(deleted) => removed += deleted,
                    Err(e) => warn!("Redis DEL error during clear: {}", e),
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Cache CLEAR: {} authors", removed);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
