//! Server configuration, loaded from environment variables at startup.

use pantry_core::config::{env_opt, env_or, parse_env};
use pantry_core::{ProviderConfig, UploadLimits};

/// Runtime configuration for pantry-server.
///
/// Every field has a default so the server starts without any environment
/// variables; without provider keys every answer comes from the fallbacks.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`). `PORT` overrides the port.
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS origins; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui`.
    pub enable_swagger: bool,

    pub upload_limits: UploadLimits,

    pub providers: ProviderConfig,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = UploadLimits::default();
        let max_image_mb: usize = parse_env("PANTRY_MAX_IMAGE_MB", defaults.max_image_bytes / MIB);
        Self {
            bind_address: bind_address(env_or("PANTRY_BIND", "0.0.0.0:5000"), env_opt("PORT")),
            log_level: env_or("PANTRY_LOG", "info"),
            log_json: env_flag("PANTRY_LOG_JSON", false),
            cors_allowed_origins: env_opt("PANTRY_CORS_ORIGINS"),
            enable_swagger: env_flag("PANTRY_ENABLE_SWAGGER", true),
            upload_limits: UploadLimits {
                max_images: parse_env("PANTRY_MAX_IMAGES", defaults.max_images),
                max_image_bytes: max_image_mb * MIB,
            },
            providers: ProviderConfig::from_env(),
        }
    }

    /// Largest request body the image route must accept.
    pub fn body_limit(&self) -> usize {
        self.upload_limits.max_images * self.upload_limits.max_image_bytes + MULTIPART_SLACK
    }
}

const MIB: usize = 1024 * 1024;
/// Room for multipart boundaries and part headers on top of the raw images.
const MULTIPART_SLACK: usize = MIB;

// ── private helpers ──────────────────────────────────────────────────────────

fn env_flag(key: &str, default: bool) -> bool {
    env_opt(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

/// Swap the port of `bind` for `port`, when one is given.
fn bind_address(bind: String, port: Option<String>) -> String {
    match port {
        Some(port) => {
            let host = bind.rsplit_once(':').map(|(h, _)| h).unwrap_or(&bind);
            format!("{host}:{port}")
        }
        None => bind,
    }
}
