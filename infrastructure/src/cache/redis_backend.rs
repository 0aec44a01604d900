//! Redis cache backend.
//!
//! Uses a [`ConnectionManager`] (cheap to clone, reconnects on its own).
//! All keys are namespaced with a prefix so that `clear` only removes this
//! tier's keys, walking them with `SCAN` rather than `KEYS`.

use super::backend::{CacheBackendError, RemoteCacheBackend};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, info};

/// How long to wait for the initial connection before giving up
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Keys fetched per `SCAN` round trip
const SCAN_BATCH: usize = 200;

pub struct RedisCacheBackend {
    manager: ConnectionManager,
    key_prefix: String,
}

impl RedisCacheBackend {
    /// Connect to `url` (e.g. `redis://127.0.0.1:6379/0`).
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self, CacheBackendError> {
        let client = redis::Client::open(url)?;
        let manager = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                CacheBackendError::Connection(format!(
                    "timed out after {}s connecting to {}",
                    CONNECT_TIMEOUT.as_secs(),
                    url
                ))
            })??;

        info!("Connected to Redis cache at {}", url);
        Ok(Self {
            manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    fn namespaced(&self, key: &str) -> String {
        namespaced_key(&self.key_prefix, key)
    }
}

fn namespaced_key(prefix: &str, key: &str) -> String {
    format!("{}{}", prefix, key)
}

/// `SCAN` pattern matching every key under `prefix`, with glob
/// metacharacters in the prefix escaped.
fn scan_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

/// Expiry in whole seconds; Redis rejects `EX 0`.
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl RemoteCacheBackend for RedisCacheBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheBackendError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(self.namespaced(key)).await?;
        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), CacheBackendError> {
        let mut conn = self.manager.clone();
        let key = self.namespaced(key);
        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, expiry_seconds(ttl)).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheBackendError> {
        let mut conn = self.manager.clone();
        let _: () = conn.del(self.namespaced(key)).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheBackendError> {
        let mut conn = self.manager.clone();
        let found: bool = conn.exists(self.namespaced(key)).await?;
        Ok(found)
    }

    async fn clear(&self) -> Result<(), CacheBackendError> {
        let mut conn = self.manager.clone();
        let pattern = scan_pattern(&self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0usize;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                removed += keys.len();
                let _: () = conn.del(keys).await?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Cleared {} Redis keys under {}", removed, self.key_prefix);
        Ok(())
    }
}
