//! Generate-content dialect (Gemini style).
//!
//! ```text
//! POST {endpoint_url}?key={credential}
//! {"contents": [{"parts": [{"text"}]}],
//!  "generationConfig": {"temperature", "maxOutputTokens"}}
//! → candidates[0].content.parts[0].text
//! ```

use super::error::ProviderError;
use super::http::Dialect;
use qbank_domain::ProviderConfig;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateContent;

impl GenerateContent {
    pub fn body(config: &ProviderConfig, prompt: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": config.temperature,
                "maxOutputTokens": config.max_output_tokens,
            },
        })
    }
}

impl Dialect for GenerateContent {
    fn name(&self) -> &'static str {
        "generate_content"
    }

    fn request(
        &self,
        client: &reqwest::Client,
        config: &ProviderConfig,
        prompt: &str,
    ) -> Result<reqwest::RequestBuilder, ProviderError> {
        Ok(client
            .post(&config.endpoint_url)
            .query(&[("key", config.credential.as_str())])
            .json(&Self::body(config, prompt)))
    }

    fn reply_text(&self, body: &Value) -> Option<String> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
