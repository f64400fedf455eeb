//! Redis-backed cache for dashboard summaries
//!
//! Callers never observe a cache failure: a failed read behaves as a miss and
//! a failed write or delete behaves as a no-op. Every failure is logged.
//!
//! Invalidation is prefix-based. Instead of assuming a wildcard key scan on
//! the backend, every `set` registers its key in a per-prefix index set and
//! `invalidate_all` deletes the registered keys plus the index itself.

use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};

/// Redis set holding the live keys for a given cache prefix
fn index_key(prefix: &str) -> String {
    format!("cache_index:{}", prefix)
}

/// Prefix portion of a cache key, up to the first `:` separator
fn key_prefix(key: &str) -> &str {
    key.split(':').next().unwrap_or(key)
}

#[derive(Clone)]
pub struct CacheStore {
    client: redis::Client,
}

impl CacheStore {
    pub fn new(url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    /// Fetch and deserialize a cached value. Any failure is a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = match self.conn().await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache connection failed on get");
                return None;
            }
        };

        let raw: Option<String> = match conn.get(key).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache get failed");
                return None;
            }
        };

        raw.and_then(|s| match serde_json::from_str(&s) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cached value failed to deserialize");
                None
            }
        })
    }

    /// Serialize and store a value with a TTL, registering the key in the
    /// prefix index. Failures are absorbed.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) {
        let payload = match serde_json::to_string(value) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache value failed to serialize");
                return;
            }
        };

        let mut conn = match self.conn().await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache connection failed on set");
                return;
            }
        };

        if let Err(e) = conn.set_ex::<_, _, ()>(key, payload, ttl_seconds).await {
            tracing::warn!(error = %e, key = %key, "Cache set failed");
            return;
        }

        let index = index_key(key_prefix(key));
        if let Err(e) = conn.sadd::<_, _, ()>(&index, key).await {
            tracing::warn!(error = %e, key = %key, "Cache index registration failed");
        }
    }

    /// Delete a single cached key. Failures are absorbed.
    pub async fn delete(&self, key: &str) {
        let mut conn = match self.conn().await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache connection failed on delete");
                return;
            }
        };

        if let Err(e) = conn.del::<_, ()>(key).await {
            tracing::warn!(error = %e, key = %key, "Cache delete failed");
        }

        let index = index_key(key_prefix(key));
        if let Err(e) = conn.srem::<_, _, ()>(&index, key).await {
            tracing::warn!(error = %e, key = %key, "Cache index removal failed");
        }
    }

    /// Delete every cached key registered under a prefix.
    pub async fn invalidate_all(&self, prefix: &str) {
        let mut conn = match self.conn().await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, prefix = %prefix, "Cache connection failed on invalidate");
                return;
            }
        };

        let index = index_key(prefix);
        let keys: Vec<String> = match conn.smembers(&index).await {
            Ok(k) => k,
            Err(e) => {
                tracing::warn!(error = %e, prefix = %prefix, "Cache index read failed");
                return;
            }
        };

        if keys.is_empty() {
            return;
        }

        if let Err(e) = conn.del::<_, ()>(&keys).await {
            tracing::warn!(error = %e, prefix = %prefix, "Cache invalidation delete failed");
        }
        if let Err(e) = conn.del::<_, ()>(&index).await {
            tracing::warn!(error = %e, prefix = %prefix, "Cache index delete failed");
        }

        tracing::debug!(prefix = %prefix, count = keys.len(), "Cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefix() {
        assert_eq!(key_prefix("dashboard_summary:abc"), "dashboard_summary");
        assert_eq!(key_prefix("bare"), "bare");
    }

    #[test]
    fn test_index_key() {
        assert_eq!(
            index_key("dashboard_summary"),
            "cache_index:dashboard_summary"
        );
    }
}
