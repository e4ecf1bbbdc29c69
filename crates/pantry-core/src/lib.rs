//! pantry-core: ingredient identification, recipe generation and chat sessions.
//!
//! Everything here is transport-agnostic; `pantry-server` maps HTTP requests
//! onto [`ChatService`] and [`ImageAnalyzer`].

pub mod analyze;
pub mod chain;
pub mod chat;
pub mod composer;
pub mod config;
pub mod error;
pub mod extract;
pub mod ingredients;
pub mod providers;
pub mod session;
pub mod vision;

pub use analyze::{ImageAnalysis, ImageAnalyzer, UploadLimits};
pub use chain::ProviderChain;
pub use chat::{ChatService, UserTurn};
pub use composer::{RecipeComposer, RecipePreferences, RecipeRequest};
pub use config::ProviderConfig;
pub use error::{ChatError, ProviderError};
pub use session::{ChatSession, InMemorySessionRepository, Message, Role, SessionRepository};
pub use vision::IngredientVision;

use std::sync::Arc;

use tracing::info;

/// The two services the HTTP surface needs, wired from configuration.
#[derive(Clone)]
pub struct Services {
    pub chat: ChatService,
    pub images: ImageAnalyzer,
}

impl Services {
    /// Wire real provider clients and an in-memory session store.
    pub fn from_config(cfg: &ProviderConfig, limits: UploadLimits) -> Self {
        let client = providers::http_client(cfg.request_timeout);
        let chain = ProviderChain::new(providers::text_providers(cfg, &client));
        let vision = IngredientVision::new(providers::vision_provider(cfg, &client));
        info!(
            text_providers = ?chain.provider_names(),
            timeout_ms = cfg.request_timeout.as_millis() as u64,
            "provider chain ready"
        );
        Self::new(
            Arc::new(InMemorySessionRepository::new()),
            chain,
            vision,
            limits,
        )
    }

    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        chain: ProviderChain,
        vision: IngredientVision,
        limits: UploadLimits,
    ) -> Self {
        Self {
            chat: ChatService::new(sessions, RecipeComposer::new(chain)),
            images: ImageAnalyzer::new(vision, limits),
        }
    }
}
