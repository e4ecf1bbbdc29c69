//! Ingredient identification with a degrade-not-fail policy.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::ingredients::parse_ingredients;
use crate::providers::VisionProvider;

/// Instruction sent alongside every image.
pub const VISION_INSTRUCTION: &str = "Extract ONLY ingredient names from this image. One per line.";

/// Returned whenever the vision provider is missing, fails, or yields nothing usable.
pub const FALLBACK_INGREDIENTS: [&str; 3] = ["tomato", "onion", "garlic"];

pub fn fallback_ingredients() -> Vec<String> {
    FALLBACK_INGREDIENTS.iter().map(|s| (*s).to_owned()).collect()
}

/// Wraps an optional [`VisionProvider`] so callers always get a non-empty list.
#[derive(Clone)]
pub struct IngredientVision {
    provider: Option<Arc<dyn VisionProvider>>,
}

impl IngredientVision {
    pub fn new(provider: Option<Arc<dyn VisionProvider>>) -> Self {
        Self { provider }
    }

    /// Name of the configured provider, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Identify ingredient candidates in one image.
    ///
    /// Never fails: any provider error, or an answer the parser reduces to
    /// nothing, yields [`FALLBACK_INGREDIENTS`].
    pub async fn identify_ingredients(&self, image: &[u8]) -> Vec<String> {
        let Some(provider) = &self.provider else {
            debug!("no vision provider configured; using fallback ingredients");
            return fallback_ingredients();
        };

        match provider.describe(image, VISION_INSTRUCTION).await {
            Ok(text) => {
                let found = parse_ingredients(&text);
                if !found.is_empty() {
                    debug!(provider = provider.name(), count = found.len(), "ingredients identified");
                    return found;
                }
                warn!(provider = provider.name(), "vision output contained no ingredients; using fallback");
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "vision provider failed; using fallback");
            }
        }
        fallback_ingredients()
    }
}
