use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde_json::json;

use super::{model_url, post_json, TextProvider, VisionProvider};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::extract::{extract_text, TEXT_SHAPES, VISION_SHAPES};

/// Hugging Face inference endpoint for an image-to-text model.
pub struct HfVisionClient {
    client: Client,
    url: String,
    api_key: String,
    timeout: Duration,
}

impl HfVisionClient {
    pub fn new(client: Client, url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    /// `None` unless both `HF_API_KEY` and `HF_VISION_MODEL` are configured.
    pub fn from_config(cfg: &ProviderConfig, client: Client) -> Option<Self> {
        let key = cfg.hf_api_key.as_deref()?;
        let model = cfg.hf_vision_model.as_deref()?;
        Some(Self::new(
            client,
            model_url(&cfg.hf_api_base, model),
            key,
            cfg.request_timeout,
        ))
    }
}

#[async_trait]
impl VisionProvider for HfVisionClient {
    fn name(&self) -> &str {
        "huggingface-vision"
    }

    async fn describe(&self, image: &[u8], instruction: &str) -> Result<String, ProviderError> {
        let b64 = base64::engine::general_purpose::STANDARD.encode(image);
        let payload = json!({
            "inputs": {
                "text":  instruction,
                "image": format!("data:image/jpeg;base64,{b64}"),
            }
        });
        let body = post_json(&self.client, &self.url, &self.api_key, &payload, self.timeout).await?;
        extract_text(&body, VISION_SHAPES).ok_or(ProviderError::EmptyResponse)
    }
}

/// Hugging Face inference endpoint for a plain text-generation model.
pub struct HfTextClient {
    client: Client,
    url: String,
    api_key: String,
    timeout: Duration,
}

impl HfTextClient {
    pub fn new(client: Client, url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    /// `None` unless both `HF_API_KEY` and `HF_TEXT_MODEL` are configured.
    pub fn from_config(cfg: &ProviderConfig, client: Client) -> Option<Self> {
        let key = cfg.hf_api_key.as_deref()?;
        let model = cfg.hf_text_model.as_deref()?;
        Some(Self::new(
            client,
            model_url(&cfg.hf_api_base, model),
            key,
            cfg.request_timeout,
        ))
    }
}

#[async_trait]
impl TextProvider for HfTextClient {
    fn name(&self) -> &str {
        "huggingface-text"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let payload = json!({ "inputs": prompt });
        let body = post_json(&self.client, &self.url, &self.api_key, &payload, self.timeout).await?;
        extract_text(&body, TEXT_SHAPES).ok_or(ProviderError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::http_client;
    use crate::providers::testing::serve;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    fn hf_config(base: &str) -> ProviderConfig {
        ProviderConfig {
            hf_api_base: format!("{base}/models"),
            hf_api_key: Some("k".into()),
            hf_vision_model: Some("org/vision".into()),
            hf_text_model: Some("org/text".into()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn vision_url_is_base_plus_model() {
        let cfg = ProviderConfig {
            hf_api_base: "https://example.test/models/".into(),
            hf_api_key: Some("k".into()),
            hf_vision_model: Some("org/vision".into()),
            ..ProviderConfig::default()
        };
        let client = HfVisionClient::from_config(&cfg, http_client(cfg.request_timeout)).unwrap();
        assert_eq!(client.url, "https://example.test/models/org/vision");
    }

    #[test]
    fn text_client_requires_model() {
        let cfg = ProviderConfig {
            hf_api_key: Some("k".into()),
            hf_text_model: None,
            ..ProviderConfig::default()
        };
        assert!(HfTextClient::from_config(&cfg, http_client(cfg.request_timeout)).is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_http_error() {
        // Port 9 (discard) on loopback is not expected to serve HTTP.
        let client = HfTextClient::new(
            http_client(Duration::from_millis(500)),
            "http://127.0.0.1:9/model",
            "k",
            Duration::from_millis(500),
        );
        let err = client.generate("hi").await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Http(_) | ProviderError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn text_client_reads_generated_text_array() {
        let router = Router::new().route(
            "/models/org/text",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["inputs"].as_str().unwrap_or_default().to_owned();
                Json(json!([{ "generated_text": format!("Recipe for {prompt}") }]))
            }),
        );
        let cfg = hf_config(&serve(router).await);
        let client = HfTextClient::from_config(&cfg, http_client(cfg.request_timeout)).unwrap();
        assert_eq!(client.generate("egg").await.unwrap(), "Recipe for egg");
    }

    #[tokio::test]
    async fn vision_client_sends_data_url_and_reads_field() {
        let router = Router::new().route(
            "/models/org/vision",
            post(|Json(body): Json<Value>| async move {
                let image = body["inputs"]["image"].as_str().unwrap_or_default();
                let answer = if image.starts_with("data:image/jpeg;base64,") {
                    format!("{}\nTomato\nBasil", body["inputs"]["text"].as_str().unwrap_or_default())
                } else {
                    String::new()
                };
                Json(json!({ "generated_text": answer }))
            }),
        );
        let cfg = hf_config(&serve(router).await);
        let client = HfVisionClient::from_config(&cfg, http_client(cfg.request_timeout)).unwrap();
        let text = client.describe(b"\xff\xd8jpeg", "List ingredients").await.unwrap();
        assert_eq!(text, "List ingredients\nTomato\nBasil");
    }
}
