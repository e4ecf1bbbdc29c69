use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Multipart body for `POST /api/images/analyze` (documentation only).
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct AnalyzeImagesUpload {
    /// One to ten image files under the repeated `images` field.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<Vec<u8>>,
}

/// Response body for `POST /api/images/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImagesResponse {
    pub success: bool,
    /// Deduplicated ingredients across all images.
    pub ingredients: Vec<String>,
    pub image_count: usize,
}
