use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{post_json, TextProvider};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::extract::{extract_text, CHAT_SHAPES};

/// OpenAI-style chat-completions endpoint (DeepSeek by default).
pub struct DeepSeekClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl DeepSeekClient {
    /// `None` when `DEEPSEEK_API_KEY` is not configured.
    pub fn from_config(cfg: &ProviderConfig, client: Client) -> Option<Self> {
        let api_key = cfg.deepseek_api_key.clone()?;
        Some(Self {
            client,
            url: cfg.deepseek_api_url.clone(),
            api_key,
            model: cfg.deepseek_model.clone(),
            max_tokens: cfg.max_tokens,
            timeout: cfg.request_timeout,
        })
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model":      self.model,
            "messages":   [{ "role": "user", "content": prompt }],
            "max_tokens": self.max_tokens,
        })
    }
}

#[async_trait]
impl TextProvider for DeepSeekClient {
    fn name(&self) -> &str {
        "deepseek"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let payload = self.request_body(prompt);
        let body = post_json(&self.client, &self.url, &self.api_key, &payload, self.timeout).await?;
        extract_text(&body, CHAT_SHAPES).ok_or(ProviderError::EmptyResponse)
    }
}
