//! Batch ingredient identification over uploaded images.

use std::collections::HashSet;

use bytes::Bytes;
use futures::future::join_all;
use tracing::info;

use crate::error::ChatError;
use crate::vision::IngredientVision;

pub const DEFAULT_MAX_IMAGES: usize = 10;
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_images: usize,
    pub max_image_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_images: DEFAULT_MAX_IMAGES,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl UploadLimits {
    /// Reject a batch whose size is outside `1..=max_images`.
    pub fn check_count(&self, count: usize) -> Result<(), ChatError> {
        if count == 0 {
            return Err(ChatError::Validation("No images provided".into()));
        }
        if count > self.max_images {
            return Err(ChatError::Validation(format!(
                "Maximum {} images allowed",
                self.max_images
            )));
        }
        Ok(())
    }

    pub fn check_size(&self, name: &str, len: usize) -> Result<(), ChatError> {
        if len > self.max_image_bytes {
            return Err(ChatError::Validation(format!(
                "Image '{name}' is {len} bytes; maximum is {} bytes",
                self.max_image_bytes
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAnalysis {
    /// Union of every image's ingredients, first occurrence kept.
    pub ingredients: Vec<String>,
    pub image_count: usize,
}

#[derive(Clone)]
pub struct ImageAnalyzer {
    vision: IngredientVision,
    limits: UploadLimits,
}

impl ImageAnalyzer {
    pub fn new(vision: IngredientVision, limits: UploadLimits) -> Self {
        Self { vision, limits }
    }

    pub fn vision_provider(&self) -> Option<&str> {
        self.vision.provider_name()
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    /// Identify ingredients in every image concurrently and merge the results.
    pub async fn analyze(&self, images: &[Bytes]) -> Result<ImageAnalysis, ChatError> {
        self.limits.check_count(images.len())?;
        for (i, image) in images.iter().enumerate() {
            self.limits.check_size(&format!("#{}", i + 1), image.len())?;
        }

        let per_image = join_all(
            images
                .iter()
                .map(|image| self.vision.identify_ingredients(image)),
        )
        .await;

        let ingredients = dedupe(per_image.into_iter().flatten());
        info!(images = images.len(), ingredients = ingredients.len(), "image analysis done");
        Ok(ImageAnalysis {
            ingredients,
            image_count: images.len(),
        })
    }
}

fn dedupe(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
