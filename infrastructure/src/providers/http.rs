//! HTTP provider shared by both request dialects.
//!
//! A [`Dialect`] knows how to shape the request and where the reply text
//! lives; [`HttpProvider`] owns the client, the per-attempt timeout and the
//! retry loop.

use super::error::ProviderError;
use super::retry::RetryPolicy;
use qbank_domain::{ProviderCallOutcome, ProviderConfig, preview};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info};

/// Characters of an error body kept in failure reasons
const ERROR_BODY_PREVIEW: usize = 200;

/// Request/response shape of one provider family.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Build the POST for `prompt` (URL, headers, JSON body).
    fn request(
        &self,
        client: &reqwest::Client,
        config: &ProviderConfig,
        prompt: &str,
    ) -> Result<reqwest::RequestBuilder, ProviderError>;

    /// Pull the reply text out of a 2xx JSON body.
    fn reply_text(&self, body: &Value) -> Option<String>;
}

pub struct HttpProvider<D> {
    dialect: D,
    config: ProviderConfig,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl<D: Dialect> HttpProvider<D> {
    /// Provider with a client honoring the configured timeout and retries.
    pub fn new(dialect: D, config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
        Ok(Self::with_client(dialect, config, client))
    }

    /// Provider using a caller-supplied client (shared pools, tests).
    pub fn with_client(dialect: D, config: ProviderConfig, client: reqwest::Client) -> Self {
        let retry = RetryPolicy::new(config.max_retries);
        Self {
            dialect,
            config,
            client,
            retry,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// One POST, no retry.
    async fn attempt(&self, prompt: &str) -> Result<String, ProviderError> {
        let response = self
            .dialect
            .request(&self.client, &self.config, prompt)?
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: preview(body.trim(), ERROR_BODY_PREVIEW),
            });
        }

        let body: Value = response.json().await?;
        self.dialect.reply_text(&body).ok_or_else(|| {
            ProviderError::UnexpectedShape(preview(&body.to_string(), ERROR_BODY_PREVIEW))
        })
    }

    /// Call with retries; never fails, the outcome carries the failure.
    pub async fn call(&self, prompt: &str) -> ProviderCallOutcome {
        let label = format!("{} ({})", self.config.display_name, self.config.model);
        let start = Instant::now();
        debug!(
            "Calling {} via {} dialect: {}",
            label,
            self.dialect.name(),
            preview(prompt, 50)
        );

        let outcome = self.retry.run(&label, |_| self.attempt(prompt)).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome.result {
            Ok(text) => {
                info!(
                    "{} replied in {}ms after {} attempt(s)",
                    label, latency_ms, outcome.attempts
                );
                ProviderCallOutcome::success(text, latency_ms, outcome.attempts)
            }
            Err(e) => {
                error!(
                    "{} failed after {} attempt(s): {}",
                    label, outcome.attempts, e
                );
                ProviderCallOutcome::failure(e.to_string(), latency_ms, outcome.attempts)
            }
        }
    }
}
