//! OpenAI-compatible chat-completions dialect.
//!
//! ```text
//! POST {endpoint_url}
//! Authorization: Bearer {credential}
//! {"model", "messages": [{"role": "user", "content"}], "stream": false,
//!  "max_tokens", "temperature"}
//! → choices[0].message.content
//! ```

use super::error::ProviderError;
use super::http::Dialect;
use qbank_domain::ProviderConfig;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, Default)]
pub struct ChatCompletions;

impl ChatCompletions {
    pub fn body(config: &ProviderConfig, prompt: &str) -> Value {
        json!({
            "model": config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false,
            "max_tokens": config.max_output_tokens,
            "temperature": config.temperature,
        })
    }
}

impl Dialect for ChatCompletions {
    fn name(&self) -> &'static str {
        "chat_completions"
    }

    fn request(
        &self,
        client: &reqwest::Client,
        config: &ProviderConfig,
        prompt: &str,
    ) -> Result<reqwest::RequestBuilder, ProviderError> {
        Ok(client
            .post(&config.endpoint_url)
            .bearer_auth(&config.credential)
            .json(&Self::body(config, prompt)))
    }

    fn reply_text(&self, body: &Value) -> Option<String> {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
