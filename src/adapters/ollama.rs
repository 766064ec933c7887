use crate::domain::ports::TextGenerator;
use crate::utils::error::{Result, ScanError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// 本地 Ollama 模型，適合產生短查詢
pub struct OllamaGenerator {
    client: Client,
    model: String,
    temperature: f32,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(model: String, temperature: f32, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            model,
            temperature,
            base_url: DEFAULT_OLLAMA_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let endpoint = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(&endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScanError::generation(format!("request to ollama/{} failed: {}", self.model, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::generation(format!(
                "ollama/{} returned {}: {}",
                self.model, status, body
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ScanError::generation(format!("malformed ollama response: {}", e)))?;
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_generate_without_streaming() {
        let server = MockServer::start_async().await;
        let generate = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body_partial(r#"{"model": "qwen3:4b", "stream": false}"#);
                then.status(200).json_body(json!({
                    "model": "qwen3:4b",
                    "response": "<think>coffee...</think>\nspecialty coffee roasters",
                    "done": true
                }));
            })
            .await;

        let generator = OllamaGenerator::new("qwen3:4b".to_string(), 0.2, Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.base_url());
        let text = generator.complete("query please").await.unwrap();

        generate.assert_async().await;
        assert!(text.ends_with("specialty coffee roasters"));
    }

    #[tokio::test]
    async fn test_model_not_found_is_generation_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(404).body(r#"{"error":"model not found"}"#);
            })
            .await;

        let generator = OllamaGenerator::new("missing".to_string(), 0.2, Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.base_url());
        let err = generator.complete("x").await.unwrap_err();
        assert!(err.to_string().contains("model not found"));
    }
}
