//! OpenAI Chat Completions adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{GenerateError, Generator, GeneratorConfig};

/// Generator backed by `POST /v1/chat/completions`.
pub struct OpenAiGenerator {
    model: String,
    api_key: String,
    url: String,
    max_tokens: u32,
    http: Client,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig, api_key: String) -> Result<Self, GenerateError> {
        debug!(model = %config.model, base_url = %config.base_url, "OpenAiGenerator::new");
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            model: config.model.clone(),
            api_key,
            url: config.endpoint("/v1/chat/completions"),
            max_tokens: config.max_tokens,
            http,
        })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_completion_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        })
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "generate: called");
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
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

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::InvalidResponse(e.to_string()))?;
        body.into_text()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice; a null content is empty text.
    fn into_text(self) -> Result<String, GenerateError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerateError::InvalidResponse("response has no choices".to_owned()))?;
        Ok(choice.message.content.unwrap_or_default())
    }
}
