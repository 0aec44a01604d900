//! Answer cache adapters.
//!
//! ```text
//! AnswerCache (port)
//!   ├── InMemoryAnswerCache          <- concurrent map, lazy TTL
//!   └── FallbackAnswerCache<B>       <- write-through local mirror
//!         └── RedisCacheBackend      <- feature "redis"
//! ```
//!
//! The strategy is chosen at startup by [`build_answer_cache`]. If the
//! networked backend cannot be reached at that point the tier degrades to
//! the in-memory cache instead of blocking startup.

mod backend;
mod fallback;
mod memory;
#[cfg(feature = "redis")]
mod redis_backend;

pub use backend::{CacheBackendError, RemoteCacheBackend};
pub use fallback::FallbackAnswerCache;
pub use memory::InMemoryAnswerCache;
#[cfg(feature = "redis")]
pub use redis_backend::RedisCacheBackend;

use qbank_application::ports::answer_cache::AnswerCache;
use qbank_application::ports::resolution_observer::{ResolutionEvent, ResolutionObserver};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Default key namespace for cached answers
pub const DEFAULT_KEY_PREFIX: &str = "qbank:answer:";

/// Which cache implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackendKind {
    #[default]
    Memory,
    Redis,
}

impl CacheBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackendKind::Memory => "memory",
            CacheBackendKind::Redis => "redis",
        }
    }
}

impl std::str::FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "local" => Ok(CacheBackendKind::Memory),
            "redis" => Ok(CacheBackendKind::Redis),
            other => Err(format!("unknown cache backend: {}", other)),
        }
    }
}

/// Resolved cache settings
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub backend: CacheBackendKind,
    /// Tier-wide entry lifetime
    pub ttl: Duration,
    pub redis_url: String,
    pub key_prefix: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            ttl: Duration::from_secs(3600),
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// Build the configured cache tier.
pub async fn build_answer_cache(
    settings: &CacheSettings,
    observer: Arc<dyn ResolutionObserver>,
) -> Arc<dyn AnswerCache> {
    match settings.backend {
        CacheBackendKind::Memory => {
            info!("Using in-memory answer cache (ttl {}s)", settings.ttl.as_secs());
            Arc::new(InMemoryAnswerCache::new(Some(settings.ttl)))
        }
        CacheBackendKind::Redis => build_redis_cache(settings, observer).await,
    }
}

#[cfg(feature = "redis")]
async fn build_redis_cache(
    settings: &CacheSettings,
    observer: Arc<dyn ResolutionObserver>,
) -> Arc<dyn AnswerCache> {
    match RedisCacheBackend::connect(&settings.redis_url, &settings.key_prefix).await {
        Ok(backend) => Arc::new(
            FallbackAnswerCache::new(backend, Some(settings.ttl)).with_observer(observer),
        ),
        Err(e) => degrade_to_memory(settings, observer, &e),
    }
}

#[cfg(not(feature = "redis"))]
async fn build_redis_cache(
    settings: &CacheSettings,
    observer: Arc<dyn ResolutionObserver>,
) -> Arc<dyn AnswerCache> {
    let error = CacheBackendError::Connection(
        "redis support not compiled in (enable the \"redis\" feature)".to_string(),
    );
    degrade_to_memory(settings, observer, &error)
}

fn degrade_to_memory(
    settings: &CacheSettings,
    observer: Arc<dyn ResolutionObserver>,
    error: &CacheBackendError,
) -> Arc<dyn AnswerCache> {
    warn!("Redis cache unavailable, falling back to in-memory cache: {}", error);
    observer.record(ResolutionEvent::cache_degraded(
        "redis",
        "connect",
        &error.to_string(),
    ));
    Arc::new(InMemoryAnswerCache::new(Some(settings.ttl)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbank_application::ports::resolution_observer::NoResolutionObserver;

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!(
            "Redis".parse::<CacheBackendKind>().unwrap(),
            CacheBackendKind::Redis
        );
        assert_eq!(
            "memory".parse::<CacheBackendKind>().unwrap(),
            CacheBackendKind::Memory
        );
        assert!("memcached".parse::<CacheBackendKind>().is_err());
    }

    #[tokio::test]
    async fn test_build_memory_cache() {
        let cache =
            build_answer_cache(&CacheSettings::default(), Arc::new(NoResolutionObserver)).await;
        assert_eq!(cache.backend_name(), "memory");
        assert!(cache.set("q", "a", None).await);
        assert_eq!(cache.get("q").await.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_unreachable_redis_degrades_to_memory() {
        let settings = CacheSettings {
            backend: CacheBackendKind::Redis,
            // Port 1 on loopback: refused immediately
            redis_url: "redis://127.0.0.1:1/0".to_string(),
            ..CacheSettings::default()
        };
        let cache = build_answer_cache(&settings, Arc::new(NoResolutionObserver)).await;
        assert_eq!(cache.backend_name(), "memory");
        assert!(cache.set("q", "a", None).await);
        assert!(cache.exists("q").await);
    }
}
