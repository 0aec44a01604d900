//! Write-through fallback decorator over a networked backend.
//!
//! Every successful remote write is mirrored into a local
//! [`InMemoryAnswerCache`], and remote read hits refresh the mirror. When the
//! backend fails, the operation is served from the mirror and the failure is
//! logged and reported as a `cache_degraded` event. Callers never see an
//! error.

use super::backend::{CacheBackendError, RemoteCacheBackend};
use super::memory::InMemoryAnswerCache;
use async_trait::async_trait;
use qbank_application::ports::answer_cache::AnswerCache;
use qbank_application::ports::resolution_observer::{
    NoResolutionObserver, ResolutionEvent, ResolutionObserver,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct FallbackAnswerCache<B> {
    remote: B,
    local: InMemoryAnswerCache,
    default_ttl: Option<Duration>,
    observer: Arc<dyn ResolutionObserver>,
}

impl<B: RemoteCacheBackend> FallbackAnswerCache<B> {
    pub fn new(remote: B, default_ttl: Option<Duration>) -> Self {
        Self {
            remote,
            local: InMemoryAnswerCache::new(default_ttl),
            default_ttl,
            observer: Arc::new(NoResolutionObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn remote(&self) -> &B {
        &self.remote
    }

    pub fn local(&self) -> &InMemoryAnswerCache {
        &self.local
    }

    fn degraded(&self, operation: &str, error: &CacheBackendError) {
        warn!(
            "{} cache {} failed, using local mirror: {}",
            self.remote.name(),
            operation,
            error
        );
        self.observer.record(ResolutionEvent::cache_degraded(
            self.remote.name(),
            operation,
            &error.to_string(),
        ));
    }
}

#[async_trait]
impl<B: RemoteCacheBackend> AnswerCache for FallbackAnswerCache<B> {
    fn backend_name(&self) -> &'static str {
        self.remote.name()
    }

    async fn get(&self, key: &str) -> Option<String> {
        match self.remote.get(key).await {
            Ok(Some(value)) => {
                self.local.set(key, &value, None).await;
                Some(value)
            }
            Ok(None) => None,
            Err(e) => {
                self.degraded("get", &e);
                self.local.get(key).await
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> bool {
        let ttl = ttl.or(self.default_ttl);
        match self.remote.set(key, value, ttl).await {
            Ok(()) => debug!("Mirrored {} write locally", self.remote.name()),
            Err(e) => self.degraded("set", &e),
        }
        self.local.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> bool {
        if let Err(e) = self.remote.delete(key).await {
            self.degraded("delete", &e);
        }
        self.local.delete(key).await
    }

    async fn clear(&self) -> bool {
        if let Err(e) = self.remote.clear().await {
            self.degraded("clear", &e);
        }
        self.local.clear().await
    }

    async fn exists(&self, key: &str) -> bool {
        match self.remote.exists(key).await {
            Ok(found) => found,
            Err(e) => {
                self.degraded("exists", &e);
                self.local.exists(key).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Remote backend that can be switched off mid-test.
    #[derive(Default)]
    struct FlakyRemote {
        entries: Mutex<HashMap<String, String>>,
        down: AtomicBool,
    }

    impl FlakyRemote {
        fn set_down(&self, down: bool) {
            self.down.store(down, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), CacheBackendError> {
            if self.down.load(Ordering::SeqCst) {
                Err(CacheBackendError::Connection("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RemoteCacheBackend for FlakyRemote {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn get(&self, key: &str) -> Result<Option<String>, CacheBackendError> {
            self.check()?;
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(
            &self,
            key: &str,
            value: &str,
            _ttl: Option<Duration>,
        ) -> Result<(), CacheBackendError> {
            self.check()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), CacheBackendError> {
            self.check()?;
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }

        async fn exists(&self, key: &str) -> Result<bool, CacheBackendError> {
            self.check()?;
            Ok(self.entries.lock().unwrap().contains_key(key))
        }

        async fn clear(&self) -> Result<(), CacheBackendError> {
            self.check()?;
            self.entries.lock().unwrap().clear();
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingObserver {
        degraded: Mutex<Vec<String>>,
    }

    impl ResolutionObserver for CountingObserver {
        fn record(&self, event: ResolutionEvent) {
            if event.event_type == "cache_degraded" {
                let op = event.payload["operation"].as_str().unwrap_or("").to_string();
                self.degraded.lock().unwrap().push(op);
            }
        }
    }

    #[tokio::test]
    async fn test_healthy_remote_writes_through() {
        let cache = FallbackAnswerCache::new(FlakyRemote::default(), None);
        assert!(cache.set("q", "A. 北京", None).await);

        assert_eq!(
            cache.remote().entries.lock().unwrap().get("q").map(String::as_str),
            Some("A. 北京")
        );
        assert_eq!(cache.local().get("q").await.as_deref(), Some("A. 北京"));
        assert_eq!(cache.get("q").await.as_deref(), Some("A. 北京"));
    }

    #[tokio::test]
    async fn test_outage_serves_mirror() {
        let observer = Arc::new(CountingObserver::default());
        let cache =
            FallbackAnswerCache::new(FlakyRemote::default(), None).with_observer(observer.clone());
        cache.set("q", "A. 北京", None).await;

        cache.remote().set_down(true);
        assert_eq!(cache.get("q").await.as_deref(), Some("A. 北京"));
        assert!(cache.exists("q").await);
        assert_eq!(*observer.degraded.lock().unwrap(), vec!["get", "exists"]);
    }

    #[tokio::test]
    async fn test_writes_succeed_during_outage() {
        let cache = FallbackAnswerCache::new(FlakyRemote::default(), None);
        cache.remote().set_down(true);

        assert!(cache.set("q", "B. 上海", None).await);
        assert_eq!(cache.get("q").await.as_deref(), Some("B. 上海"));
        assert!(cache.delete("q").await);
        assert_eq!(cache.get("q").await, None);
        assert!(cache.clear().await);
    }

    #[tokio::test]
    async fn test_remote_hit_refreshes_mirror() {
        let cache = FallbackAnswerCache::new(FlakyRemote::default(), None);
        cache
            .remote()
            .entries
            .lock()
            .unwrap()
            .insert("q".to_string(), "written elsewhere".to_string());

        assert_eq!(cache.get("q").await.as_deref(), Some("written elsewhere"));
        cache.remote().set_down(true);
        assert_eq!(cache.get("q").await.as_deref(), Some("written elsewhere"));
    }

    #[tokio::test]
    async fn test_remote_miss_is_authoritative() {
        let cache = FallbackAnswerCache::new(FlakyRemote::default(), None);
        cache.set("q", "a", None).await;
        cache.remote().entries.lock().unwrap().clear();

        assert_eq!(cache.get("q").await, None);
    }

    // ==================== Resolution over a degraded cache ====================

    mod resolution {
        use super::*;
        use crate::store::InMemoryQuestionStore;
        use qbank_application::{
            AnswerProvider, ProviderAnswerService, QuestionStore, ResolveQuestionUseCase,
            StoreError,
        };
        use qbank_domain::{
            AnswerOrigin, NewStoredAnswer, ProviderCallOutcome, QuestionKind, StoredAnswer,
        };
        use std::sync::atomic::AtomicUsize;

        #[derive(Default)]
        struct CountingStore {
            inner: InMemoryQuestionStore,
            finds: AtomicUsize,
        }

        #[async_trait]
        impl QuestionStore for CountingStore {
            async fn find_by_text(
                &self,
                question_text: &str,
            ) -> Result<Option<StoredAnswer>, StoreError> {
                self.finds.fetch_add(1, Ordering::SeqCst);
                self.inner.find_by_text(question_text).await
            }

            async fn insert(&self, record: NewStoredAnswer) -> Result<StoredAnswer, StoreError> {
                self.inner.insert(record).await
            }
        }

        #[derive(Default)]
        struct CountingProvider {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl AnswerProvider for CountingProvider {
            fn identifier(&self) -> &str {
                "counting"
            }

            fn model_name(&self) -> &str {
                "counting-model"
            }

            async fn call(&self, _prompt: &str) -> ProviderCallOutcome {
                self.calls.fetch_add(1, Ordering::SeqCst);
                ProviderCallOutcome::success(r#"{"answer": "北京"}"#, 3, 1)
            }
        }

        #[tokio::test]
        async fn test_write_through_hit_with_remote_down() {
            let remote = FlakyRemote::default();
            remote.set_down(true);

            let observer = Arc::new(CountingObserver::default());
            let cache = Arc::new(
                FallbackAnswerCache::new(remote, Some(Duration::from_secs(60)))
                    .with_observer(observer.clone()),
            );
            let store = Arc::new(CountingStore::default());
            let provider = Arc::new(CountingProvider::default());

            let use_case = ResolveQuestionUseCase::new(
                cache.clone(),
                store.clone(),
                ProviderAnswerService::new(provider.clone()),
            )
            .with_observer(observer.clone());

            let first = use_case
                .resolve("中国的首都是哪里？", "", QuestionKind::Single)
                .await
                .unwrap();
            assert_eq!(first.origin(), AnswerOrigin::Provider);
            assert_eq!(first.answer(), Some("北京"));

            let second = use_case
                .resolve("中国的首都是哪里？", "", QuestionKind::Single)
                .await
                .unwrap();
            assert_eq!(second.origin(), AnswerOrigin::Cache);
            assert_eq!(second.answer(), Some("北京"));

            assert_eq!(store.finds.load(Ordering::SeqCst), 1);
            assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
            assert_eq!(store.inner.len().await, 1);
            assert_eq!(*observer.degraded.lock().unwrap(), vec!["get", "set", "get"]);
        }
    }
}
