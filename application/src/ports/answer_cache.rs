//! Answer cache port
//!
//! Defines the cache tier consulted before the store and the provider.

use async_trait::async_trait;
use std::time::Duration;

/// Key/value tier mapping question text to answer text.
///
/// Keys are the question text verbatim (case-sensitive). Every operation is
/// idempotent and infallible from the caller's point of view: an unreachable
/// backend reads as a miss and a failed write reports `false`, so the
/// resolver never has to handle cache errors.
#[async_trait]
pub trait AnswerCache: Send + Sync {
    /// Short backend name for log lines ("memory", "redis", ...)
    fn backend_name(&self) -> &'static str;

    /// Look up an answer
    async fn get(&self, key: &str) -> Option<String>;

    /// Store an answer; `ttl = None` uses the tier-wide default
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> bool;

    /// Remove one entry; `true` if the tier accepted the delete
    async fn delete(&self, key: &str) -> bool;

    /// Remove every entry owned by this tier
    async fn clear(&self) -> bool;

    /// Whether an entry is present
    async fn exists(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }
}
