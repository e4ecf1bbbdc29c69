//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use pantry_core::{ChatService, ImageAnalyzer, Services};

use crate::config::Config;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Session-backed chat operations.
    pub chat: ChatService,
    /// Batch ingredient identification.
    pub images: ImageAnalyzer,
}

impl AppState {
    pub fn new(config: Config, services: Services) -> Self {
        Self {
            config: Arc::new(config),
            chat: services.chat,
            images: services.images,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
