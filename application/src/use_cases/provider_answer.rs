//! Provider answer service
//!
//! Builds the prompt for a request, calls the configured provider and
//! parses the reply into answer text.

use crate::ports::answer_provider::AnswerProvider;
use qbank_domain::{
    ParseStrategy, PromptTemplate, ProviderCallOutcome, ResolutionRequest, parse_answer_detailed,
    preview,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What one provider lookup produced
#[derive(Debug, Clone)]
pub struct ProviderLookup {
    /// Parsed answer, `None` when the call failed or nothing was extractable
    pub answer: Option<String>,
    pub outcome: ProviderCallOutcome,
    pub strategy: Option<ParseStrategy>,
}

/// Prompt → provider → parser pipeline
#[derive(Clone)]
pub struct ProviderAnswerService {
    provider: Arc<dyn AnswerProvider>,
}

impl ProviderAnswerService {
    pub fn new(provider: Arc<dyn AnswerProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_id(&self) -> &str {
        self.provider.identifier()
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Ask the provider for an answer.
    pub async fn lookup(&self, request: &ResolutionRequest) -> ProviderLookup {
        let prompt = PromptTemplate::answer_prompt(request);
        let outcome = self.provider.call(&prompt).await;
        let question = preview(request.question_text(), 50);

        if !outcome.succeeded {
            warn!(
                "Provider {} gave no reply for {}: {}",
                self.provider_id(),
                question,
                outcome.failure_reason.as_deref().unwrap_or("unknown failure")
            );
            return ProviderLookup {
                answer: None,
                outcome,
                strategy: None,
            };
        }

        match parse_answer_detailed(outcome.text()) {
            Some(parsed) => {
                info!(
                    "Provider answer: {} -> {}",
                    question,
                    preview(&parsed.answer, 50)
                );
                debug!("Reply parsed with {:?}", parsed.strategy);
                ProviderLookup {
                    answer: Some(parsed.answer),
                    strategy: Some(parsed.strategy),
                    outcome,
                }
            }
            None => {
                warn!(
                    "Provider reply had no extractable answer for {}: {}",
                    question,
                    preview(outcome.text(), 200)
                );
                ProviderLookup {
                    answer: None,
                    outcome,
                    strategy: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use qbank_domain::QuestionKind;
    use std::sync::Mutex;

    struct ScriptedProvider {
        outcome: ProviderCallOutcome,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(outcome: ProviderCallOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AnswerProvider for ScriptedProvider {
        fn identifier(&self) -> &str {
            "scripted"
        }

        fn model_name(&self) -> &str {
            "scripted-model"
        }

        async fn call(&self, prompt: &str) -> ProviderCallOutcome {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.outcome.clone()
        }
    }

    fn request() -> ResolutionRequest {
        ResolutionRequest::new("中国的首都是哪里？", "A. 北京 B. 上海", QuestionKind::Single)
            .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_parses_reply() {
        let provider = ScriptedProvider::new(ProviderCallOutcome::success(
            r#"{"answer": "北京"}"#,
            12,
            1,
        ));
        let service = ProviderAnswerService::new(provider.clone());

        let lookup = service.lookup(&request()).await;
        assert_eq!(lookup.answer.as_deref(), Some("北京"));
        assert_eq!(lookup.strategy, Some(ParseStrategy::FieldPattern));

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("选项：A. 北京 B. 上海"));
    }

    #[tokio::test]
    async fn test_lookup_failed_call() {
        let provider = ScriptedProvider::new(ProviderCallOutcome::failure("timeout", 30_000, 3));
        let service = ProviderAnswerService::new(provider);

        let lookup = service.lookup(&request()).await;
        assert!(lookup.answer.is_none());
        assert!(!lookup.outcome.succeeded);
    }

    #[tokio::test]
    async fn test_lookup_unparseable_reply() {
        let provider =
            ScriptedProvider::new(ProviderCallOutcome::success("I am not sure.", 5, 1));
        let service = ProviderAnswerService::new(provider);

        let lookup = service.lookup(&request()).await;
        assert!(lookup.answer.is_none());
        assert!(lookup.outcome.succeeded);
    }

    #[test]
    fn test_reports_model() {
        let provider = ScriptedProvider::new(ProviderCallOutcome::success("", 0, 0));
        let service = ProviderAnswerService::new(provider);
        assert_eq!(service.model_name(), "scripted-model");
        assert_eq!(service.provider_id(), "scripted");
    }
}
