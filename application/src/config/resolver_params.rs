//! Resolver parameters: use case behavior switches.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Behavior switches for [`ResolveQuestionUseCase`](crate::use_cases::resolve_question::ResolveQuestionUseCase).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverParams {
    /// Share one provider lookup between concurrent requests for the same
    /// question text. Off by default: concurrent misses each call the provider.
    pub coalesce_in_flight: bool,
    /// Reconcile provider answers with the options text.
    pub match_options: bool,
    /// TTL for write-through cache entries; `None` uses the tier default.
    pub cache_ttl: Option<Duration>,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            coalesce_in_flight: false,
            match_options: true,
            cache_ttl: None,
        }
    }
}

impl ResolverParams {
    // ==================== Builder Methods ====================

    pub fn with_coalesce_in_flight(mut self, enabled: bool) -> Self {
        self.coalesce_in_flight = enabled;
        self
    }

    pub fn with_match_options(mut self, enabled: bool) -> Self {
        self.match_options = enabled;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }
}
