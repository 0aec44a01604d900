//! Raw networked cache backend.
//!
//! Unlike [`AnswerCache`](qbank_application::AnswerCache), a backend reports
//! its failures. [`FallbackAnswerCache`](super::FallbackAnswerCache) turns
//! those failures into silent local-mirror reads and writes.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a networked cache backend
#[derive(Error, Debug, Clone)]
pub enum CacheBackendError {
    #[error("Cache backend connection failed: {0}")]
    Connection(String),

    #[error("Cache command failed: {0}")]
    Command(String),
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for CacheBackendError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_refusal() || e.is_connection_dropped() || e.is_io_error() {
            CacheBackendError::Connection(e.to_string())
        } else {
            CacheBackendError::Command(e.to_string())
        }
    }
}

/// Key/value backend reached over the network.
#[async_trait]
pub trait RemoteCacheBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheBackendError>;

    /// Write with an expiry; `None` keeps the key until deleted.
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), CacheBackendError>;

    async fn delete(&self, key: &str) -> Result<(), CacheBackendError>;

    async fn exists(&self, key: &str) -> Result<bool, CacheBackendError>;

    /// Remove every key this backend owns (its namespace, not the whole server).
    async fn clear(&self) -> Result<(), CacheBackendError>;
}
