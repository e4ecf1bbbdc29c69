//! Liveness endpoint, also reporting which recipe and vision providers are wired.
//!
//! Credentials are never shown; a provider appears only when its key (and
//! model, for the Hugging Face endpoints) was present at startup.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health))]
pub struct HealthApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// `{"status": "ok", "version", "providers": {"text": [...], "vision": name | null}}`.
///
/// `providers.text` lists the recipe providers in the order they are tried
/// before the static fallback; an empty list means every reply is the fallback.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is up; lists configured providers", body = Value)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status":  "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "providers": {
            "text":   state.chat.text_providers(),
            "vision": state.images.vision_provider(),
        },
    }))
}
