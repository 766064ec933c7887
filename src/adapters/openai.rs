use crate::domain::ports::TextGenerator;
use crate::utils::error::{Result, ScanError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// OpenAI 相容的 chat completions 服務
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, model: String, temperature: f32, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            temperature,
            base_url: DEFAULT_OPENAI_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let endpoint = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!("🤖 {} completion ({} prompt bytes)", self.model, prompt.len());
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScanError::generation(format!("request to {} failed: {}", self.model, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::generation(format!("{} returned {}: {}", self.model, status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScanError::generation(format!("malformed completion response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ScanError::generation("completion response contained no message"))
    }
}
