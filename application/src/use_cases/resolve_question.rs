//! Resolve Question use case
//!
//! Sequences the lookaside chain for one question:
//!
//! ```text
//! cache ──hit──▶ done
//!   │miss
//! store ──hit──▶ write cache ──▶ done
//!   │miss
//! provider ──answer──▶ match options ──▶ persist ──▶ write cache ──▶ done
//!   │no answer
//! not_found
//! ```
//!
//! Cache is authoritative over store and store over provider; the provider
//! is only called on a double miss. Nothing in here returns an error: tier
//! failures degrade to the next tier, and side-effect failures after a hit
//! are logged without touching the result.

use crate::config::ResolverParams;
use crate::ports::answer_cache::AnswerCache;
use crate::ports::question_store::QuestionStore;
use crate::ports::resolution_observer::{
    NoResolutionObserver, ResolutionEvent, ResolutionObserver,
};
use crate::use_cases::provider_answer::ProviderAnswerService;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use qbank_domain::{
    AnswerOrigin, DomainError, NewStoredAnswer, QuestionKind, ResolutionRequest,
    ResolutionResult, match_option, preview,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

type SharedLookup = Shared<BoxFuture<'static, Option<String>>>;

/// The three tiers plus the event sink, cheap to clone into spawned lookups.
#[derive(Clone)]
struct Tiers {
    cache: Arc<dyn AnswerCache>,
    store: Arc<dyn QuestionStore>,
    provider: ProviderAnswerService,
    observer: Arc<dyn ResolutionObserver>,
    params: ResolverParams,
}

/// Use case for resolving a question through cache, store and provider
pub struct ResolveQuestionUseCase {
    tiers: Tiers,
    in_flight: Mutex<HashMap<String, SharedLookup>>,
}

impl ResolveQuestionUseCase {
    pub fn new(
        cache: Arc<dyn AnswerCache>,
        store: Arc<dyn QuestionStore>,
        provider: ProviderAnswerService,
    ) -> Self {
        Self {
            tiers: Tiers {
                cache,
                store,
                provider,
                observer: Arc::new(NoResolutionObserver),
                params: ResolverParams::default(),
            },
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.tiers.observer = observer;
        self
    }

    pub fn with_params(mut self, params: ResolverParams) -> Self {
        self.tiers.params = params;
        self
    }

    pub fn params(&self) -> &ResolverParams {
        &self.tiers.params
    }

    /// Validate raw input and resolve it.
    ///
    /// The only error is an invalid request; an unanswerable question is an
    /// `Ok` not-found result.
    pub async fn resolve(
        &self,
        question_text: &str,
        options_text: &str,
        question_kind: QuestionKind,
    ) -> Result<ResolutionResult, DomainError> {
        let request = ResolutionRequest::new(question_text, options_text, question_kind)?;
        Ok(self.execute(&request).await)
    }

    /// Resolve a validated request.
    pub async fn execute(&self, request: &ResolutionRequest) -> ResolutionResult {
        let tiers = &self.tiers;
        let key = request.question_text();
        let question = preview(key, 50);

        // 1. Cache
        if let Some(answer) = tiers.cache.get(key).await.filter(|a| !a.trim().is_empty()) {
            info!("Cache hit: {}", question);
            tiers
                .observer
                .record(ResolutionEvent::cache_hit(key, tiers.cache.backend_name()));
            return ResolutionResult::hit(answer, AnswerOrigin::Cache);
        }

        // 2. Store
        match tiers.store.find_by_text(key).await {
            Ok(Some(record)) if !record.answer.trim().is_empty() => {
                info!("Store hit: {}", question);
                tiers.observer.record(ResolutionEvent::store_hit(key));
                tiers.write_cache(key, &record.answer).await;
                return ResolutionResult::hit(record.answer, AnswerOrigin::Store);
            }
            Ok(_) => debug!("Store miss: {}", question),
            Err(e) => warn!("Store lookup failed for {}, asking provider: {}", question, e),
        }

        // 3. Provider
        info!("Asking provider {}: {}", tiers.provider.provider_id(), question);
        let answer = if tiers.params.coalesce_in_flight {
            self.provider_step_shared(request).await
        } else {
            tiers.provider_step(request).await
        };

        match answer {
            Some(answer) => ResolutionResult::hit(answer, AnswerOrigin::Provider),
            None => {
                warn!("No answer found: {}", question);
                tiers.observer.record(ResolutionEvent::not_found(key));
                ResolutionResult::not_found()
            }
        }
    }

    /// Provider step with per-question de-duplication: the first caller
    /// starts the lookup, concurrent callers await the same result.
    async fn provider_step_shared(&self, request: &ResolutionRequest) -> Option<String> {
        let key = request.question_text().to_string();

        let lookup = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            match in_flight.get(&key) {
                Some(existing) => {
                    debug!("Joining in-flight lookup: {}", preview(&key, 50));
                    existing.clone()
                }
                None => {
                    let tiers = self.tiers.clone();
                    let owned = request.clone();
                    let lookup = async move { tiers.provider_step(&owned).await }
                        .boxed()
                        .shared();
                    in_flight.insert(key.clone(), lookup.clone());
                    lookup
                }
            }
        };

        let answer = lookup.clone().await;

        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if in_flight
            .get(&key)
            .is_some_and(|current| current.ptr_eq(&lookup))
        {
            in_flight.remove(&key);
        }

        answer
    }
}

impl Tiers {
    /// Ask the provider, reconcile with options, then write through.
    async fn provider_step(&self, request: &ResolutionRequest) -> Option<String> {
        let key = request.question_text();
        let lookup = self.provider.lookup(request).await;

        let answer = lookup.answer.as_deref().map(|raw| {
            if self.params.match_options && request.has_options() {
                match_option(raw, request.options_text())
            } else {
                raw.to_string()
            }
        });
        let answer = answer.filter(|a| !a.trim().is_empty());

        self.observer.record(ResolutionEvent::provider_call(
            key,
            self.provider.provider_id(),
            self.provider.model_name(),
            &lookup.outcome,
            lookup.strategy,
            answer.is_some(),
        ));

        let answer = answer?;

        if lookup.outcome.stand_in {
            warn!(
                "Stand-in answer for {} not saved: {}",
                preview(key, 50),
                lookup.outcome.failure_reason.as_deref().unwrap_or("stub provider")
            );
            return Some(answer);
        }

        match self
            .store
            .insert(NewStoredAnswer::from_request(request, answer.clone()))
            .await
        {
            Ok(stored) => debug!("Persisted answer #{}: {}", stored.id, preview(key, 50)),
            Err(e) => {
                warn!("Failed to persist answer for {}: {}", preview(key, 50), e);
                self.observer
                    .record(ResolutionEvent::persist_failed(key, &e.to_string()));
            }
        }

        self.write_cache(key, &answer).await;
        info!("Provider answer saved: {}", preview(key, 50));
        Some(answer)
    }

    async fn write_cache(&self, key: &str, answer: &str) {
        if !self.cache.set(key, answer, self.params.cache_ttl).await {
            warn!(
                "Cache write-through failed on {} backend: {}",
                self.cache.backend_name(),
                preview(key, 50)
            );
        }
    }
}
