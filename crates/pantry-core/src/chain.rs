//! Ordered text-provider fallback.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ProviderError;
use crate::providers::TextProvider;

/// Returned when every provider in the chain fails.
pub const FALLBACK_RECIPE: &str = "Try making a stir-fry or a simple salad with your ingredients.";

/// Try each candidate in order and return the first non-blank success.
///
/// Failures and blank answers are logged and skipped; `None` means every
/// candidate came up empty.
pub async fn first_success<'a, I, F>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, F)>,
    F: Future<Output = Result<String, ProviderError>>,
{
    for (name, attempt) in candidates {
        match attempt.await {
            Ok(text) if !text.trim().is_empty() => {
                info!(provider = name, output_len = text.len(), "provider produced text");
                return Some(text);
            }
            Ok(_) => warn!(provider = name, "provider returned empty text; trying next"),
            Err(e) => warn!(provider = name, error = %e, "provider failed; trying next"),
        }
    }
    None
}

/// The primary → secondary → static-string chain.
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn TextProvider>>,
    fallback: String,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn TextProvider>>) -> Self {
        Self {
            providers,
            fallback: FALLBACK_RECIPE.to_owned(),
        }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Generate text for `prompt`. Always returns a non-empty string.
    pub async fn generate(&self, prompt: &str) -> String {
        // Collected up front: a lazy iterator held across the awaits below
        // would make this future !Send.
        let attempts: Vec<_> = self
            .providers
            .iter()
            .map(|p| (p.name(), p.generate(prompt)))
            .collect();
        match first_success(attempts).await {
            Some(text) => text,
            None => {
                warn!("all text providers failed; returning static fallback");
                self.fallback.clone()
            }
        }
    }
}
