//! Provider configuration, loaded from environment variables.

use std::time::Duration;

pub const DEFAULT_HF_API_BASE: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_DEEPSEEK_API_URL: &str = "https://api.deepseek.com/chat/completions";
pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_MAX_TOKENS: u32 = 700;

/// Endpoints, credentials and limits for the external vision / text providers.
///
/// Credentials are only checked for presence when the provider list is
/// assembled: a missing key means that provider is skipped.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL the vision and secondary text models are appended to.
    pub hf_api_base: String,
    pub hf_api_key: Option<String>,
    pub hf_vision_model: Option<String>,
    pub hf_text_model: Option<String>,

    /// Full chat-completions URL of the primary text provider.
    pub deepseek_api_url: String,
    pub deepseek_api_key: Option<String>,
    pub deepseek_model: String,

    /// `max_tokens` sent to the primary provider.
    pub max_tokens: u32,

    /// Per-call timeout shared by every provider.
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hf_api_base: DEFAULT_HF_API_BASE.to_owned(),
            hf_api_key: None,
            hf_vision_model: None,
            hf_text_model: None,
            deepseek_api_url: DEFAULT_DEEPSEEK_API_URL.to_owned(),
            deepseek_api_key: None,
            deepseek_model: DEFAULT_DEEPSEEK_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ProviderConfig {
    /// Build [`ProviderConfig`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            hf_api_base: env_or("HF_API_BASE", DEFAULT_HF_API_BASE),
            hf_api_key: env_opt("HF_API_KEY"),
            hf_vision_model: env_opt("HF_VISION_MODEL"),
            hf_text_model: env_opt("HF_TEXT_MODEL"),
            deepseek_api_url: env_or("DEEPSEEK_API_URL", DEFAULT_DEEPSEEK_API_URL),
            deepseek_api_key: env_opt("DEEPSEEK_API_KEY"),
            deepseek_model: env_or("DEEPSEEK_MODEL", DEFAULT_DEEPSEEK_MODEL),
            max_tokens: parse_env("PROVIDER_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            request_timeout: Duration::from_millis(parse_env(
                "REQUEST_TIMEOUT_MS",
                DEFAULT_TIMEOUT_MS,
            )),
        }
    }
}

// Keys must never reach the logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("hf_api_base", &self.hf_api_base)
            .field("hf_api_key", &self.hf_api_key.as_ref().map(|_| "<redacted>"))
            .field("hf_vision_model", &self.hf_vision_model)
            .field("hf_text_model", &self.hf_text_model)
            .field("deepseek_api_url", &self.deepseek_api_url)
            .field(
                "deepseek_api_key",
                &self.deepseek_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("deepseek_model", &self.deepseek_model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

// ── env helpers ──────────────────────────────────────────────────────────────

/// Read `key`, treating unset and blank values alike.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_owned())
}

pub fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
