//! In-process answer cache.
//!
//! A concurrent map with lazy TTL: an expired entry is dropped the next time
//! it is read. There is no background timer and no size bound.

use async_trait::async_trait;
use qbank_application::ports::answer_cache::AnswerCache;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Process-local [`AnswerCache`].
pub struct InMemoryAnswerCache {
    entries: RwLock<HashMap<String, Entry>>,
    default_ttl: Option<Duration>,
}

impl InMemoryAnswerCache {
    /// Cache whose entries expire after `default_ttl` unless a write names
    /// its own TTL. `None` keeps entries until deleted.
    pub fn new(default_ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryAnswerCache {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl AnswerCache for InMemoryAnswerCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Expired: drop it unless a writer replaced it in between.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> bool {
        let expires_at = ttl
            .or(self.default_ttl)
            .map(|ttl| Instant::now() + ttl);
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        true
    }

    async fn delete(&self, key: &str) -> bool {
        self.entries.write().await.remove(key);
        true
    }

    async fn clear(&self) -> bool {
        self.entries.write().await.clear();
        true
    }
}
