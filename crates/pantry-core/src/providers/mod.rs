//! Clients for the external vision and text-generation services.
//!
//! Each client implements one of the provider traits so that the fallback
//! logic in [`crate::vision`] and [`crate::chain`] never touches HTTP, and
//! tests can substitute in-process fakes.

mod deepseek;
mod huggingface;

pub use deepseek::DeepSeekClient;
pub use huggingface::{HfTextClient, HfVisionClient};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::ProviderError;

/// Longest slice of an error body kept in [`ProviderError::Status`].
const ERROR_BODY_CHARS: usize = 300;

/// A text-generation endpoint taking a single prompt.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Generate text for `prompt`. An empty answer is an error.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// An image-understanding endpoint.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Describe `image` following `instruction`, returning the raw generated text.
    async fn describe(&self, image: &[u8], instruction: &str) -> Result<String, ProviderError>;
}

/// Build the shared HTTP client used by every provider.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent(concat!("pantry/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Text providers in fallback order, skipping any whose credential is missing.
pub fn text_providers(cfg: &ProviderConfig, client: &Client) -> Vec<Arc<dyn TextProvider>> {
    let mut providers: Vec<Arc<dyn TextProvider>> = Vec::new();
    match DeepSeekClient::from_config(cfg, client.clone()) {
        Some(p) => providers.push(Arc::new(p)),
        None => debug!("DEEPSEEK_API_KEY not set; primary text provider disabled"),
    }
    match HfTextClient::from_config(cfg, client.clone()) {
        Some(p) => providers.push(Arc::new(p)),
        None => debug!("HF_API_KEY or HF_TEXT_MODEL not set; secondary text provider disabled"),
    }
    providers
}

/// The configured vision provider, if its credential and model are present.
pub fn vision_provider(cfg: &ProviderConfig, client: &Client) -> Option<Arc<dyn VisionProvider>> {
    let provider = HfVisionClient::from_config(cfg, client.clone());
    if provider.is_none() {
        debug!("HF_API_KEY or HF_VISION_MODEL not set; vision provider disabled");
    }
    provider.map(|p| Arc::new(p) as Arc<dyn VisionProvider>)
}

/// POST `body` as JSON with a bearer credential and decode the JSON answer.
pub(crate) async fn post_json(
    client: &Client,
    url: &str,
    api_key: &str,
    body: &Value,
    timeout: Duration,
) -> Result<Value, ProviderError> {
    let resp = client
        .post(url)
        .bearer_auth(api_key)
        .json(body)
        .timeout(timeout)
        .send()
        .await?;

    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: text.chars().take(ERROR_BODY_CHARS).collect(),
        });
    }
    Ok(serde_json::from_str(&text)?)
}

/// Join a base URL and a model path with exactly one slash.
pub(crate) fn model_url(base: &str, model: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        model.trim_start_matches('/')
    )
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    async fn endpoint() -> String {
        let router = Router::new()
            .route(
                "/unavailable",
                post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model is loading") }),
            )
            .route("/html", post(|| async { "<html>bad gateway</html>" }))
            .route(
                "/slow",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!({ "generated_text": "too late" }))
                }),
            )
            .route(
                "/echo",
                post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_owned();
                    Json(json!({ "auth": auth, "received": body }))
                }),
            );
        testing::serve(router).await
    }

    async fn call(base: &str, path: &str, timeout: Duration) -> Result<Value, ProviderError> {
        let client = http_client(Duration::from_secs(5));
        post_json(&client, &format!("{base}{path}"), "k", &json!({ "inputs": "hi" }), timeout).await
    }

    fn full_config() -> ProviderConfig {
        ProviderConfig {
            hf_api_key: Some("hf_key".into()),
            hf_vision_model: Some("Salesforce/blip-image-captioning-large".into()),
            hf_text_model: Some("google/flan-t5-large".into()),
            deepseek_api_key: Some("sk-key".into()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn model_url_joins_with_single_slash() {
        assert_eq!(model_url("https://h.co/models/", "/a/b"), "https://h.co/models/a/b");
        assert_eq!(model_url("https://h.co/models", "a/b"), "https://h.co/models/a/b");
    }

    #[test]
    fn text_providers_are_ordered_primary_first() {
        let cfg = full_config();
        let client = http_client(cfg.request_timeout);
        let names: Vec<String> = text_providers(&cfg, &client)
            .iter()
            .map(|p| p.name().to_owned())
            .collect();
        assert_eq!(names, vec!["deepseek", "huggingface-text"]);
    }

    #[test]
    fn missing_primary_key_skips_primary() {
        let cfg = ProviderConfig {
            deepseek_api_key: None,
            ..full_config()
        };
        let client = http_client(cfg.request_timeout);
        let names: Vec<String> = text_providers(&cfg, &client)
            .iter()
            .map(|p| p.name().to_owned())
            .collect();
        assert_eq!(names, vec!["huggingface-text"]);
    }

    #[test]
    fn no_credentials_means_no_providers() {
        let cfg = ProviderConfig::default();
        let client = http_client(cfg.request_timeout);
        assert!(text_providers(&cfg, &client).is_empty());
        assert!(vision_provider(&cfg, &client).is_none());
    }

    #[tokio::test]
    async fn success_is_decoded_and_carries_bearer_key() {
        let base = endpoint().await;
        let body = call(&base, "/echo", Duration::from_secs(5)).await.unwrap();
        assert_eq!(body["auth"], "Bearer k");
        assert_eq!(body["received"]["inputs"], "hi");
    }

    #[tokio::test]
    async fn non_success_status_is_a_status_error() {
        let base = endpoint().await;
        match call(&base, "/unavailable", Duration::from_secs(5)).await {
            Err(ProviderError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "model is loading");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_success_is_a_json_error() {
        let base = endpoint().await;
        let err = call(&base, "/html", Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, ProviderError::Json(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn slow_endpoint_is_a_timeout() {
        let base = endpoint().await;
        let err = call(&base, "/slow", Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)), "got {err:?}");
    }
}
