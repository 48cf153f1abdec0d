use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::GeminiConfig;

/// Inline image payload forwarded to the model (already base64-encoded by
/// the client).
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub mime_type: String,
    pub data_b64: String,
}

/// Opaque generative capability: given a prompt and optional images, return
/// text. Fallible, possibly slow, no retry layer on top.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, images: &[ImagePart]) -> anyhow::Result<String>;
}

/// Gemini REST client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, images: &[ImagePart]) -> anyhow::Result<String> {
        anyhow::ensure!(!self.api_key.is_empty(), "GEMINI_API_KEY is not configured");

        let mut parts = vec![json!({ "text": prompt })];
        for img in images {
            parts.push(json!({
                "inline_data": {
                    "mime_type": img.mime_type,
                    "data": img.data_b64,
                }
            }));
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "temperature": 0.8,
                "topP": 0.95,
                "maxOutputTokens": 8192,
            }
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?
            .error_for_status()
            .context("gemini returned an error status")?;

        let payload: Value = response.json().await.context("gemini response not json")?;
        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .context("gemini response missing text")?
            .to_string();
        debug!(model = %self.model, chars = text.len(), "generation complete");
        Ok(text)
    }
}

/// Canned generator for tests and offline runs: echoes a fixed response.
pub struct CannedGenerator {
    pub response: String,
}

impl CannedGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str, _images: &[ImagePart]) -> anyhow::Result<String> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn canned_generator_returns_fixed_text() {
        let gen = CannedGenerator::new("Rainbow Radiance\n\nHi!");
        let out = gen.generate("whatever", &[]).await.unwrap();
        assert_eq!(out, "Rainbow Radiance\n\nHi!");
    }

    #[tokio::test]
    async fn gemini_client_refuses_without_api_key() {
        let client = GeminiClient::new(&crate::config::GeminiConfig {
            api_key: String::new(),
            model: "gemini-2.0-flash".into(),
        });
        let err = client.generate("prompt", &[]).await.unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
