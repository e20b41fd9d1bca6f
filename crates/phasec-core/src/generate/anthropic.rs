//! Anthropic Messages API adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{GenerateError, Generator, GeneratorConfig};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Generator backed by `POST /v1/messages`.
pub struct AnthropicGenerator {
    model: String,
    api_key: String,
    url: String,
    max_tokens: u32,
    http: Client,
}

impl AnthropicGenerator {
    pub fn new(config: &GeneratorConfig, api_key: String) -> Result<Self, GenerateError> {
        debug!(model = %config.model, base_url = %config.base_url, "AnthropicGenerator::new");
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            model: config.model.clone(),
            api_key,
            url: config.endpoint("/v1/messages"),
            max_tokens: config.max_tokens,
            http,
        })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        })
    }
}

#[async_trait]
impl Generator for AnthropicGenerator {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "generate: called");
        let response = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
            debug!(status = status.as_u16(), "generate: API error");
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::InvalidResponse(e.to_string()))?;
        Ok(body.into_text())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    /// First text block, or empty when the model returned none.
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .unwrap_or_default()
    }
}
