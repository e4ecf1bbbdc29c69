//! Ingredient identification from uploaded photos.
//!
//! Accepts `multipart/form-data` with one to ten files under the repeated
//! `images` field. Each file is sent to the vision provider concurrently and
//! the ingredient lists are merged without duplicates.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use tracing::debug;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::images::{AnalyzeImagesResponse, AnalyzeImagesUpload};
use crate::state::AppState;

/// Multipart field carrying the uploaded files.
const IMAGES_FIELD: &str = "images";

#[derive(OpenApi)]
#[openapi(
    paths(analyze_images),
    components(schemas(AnalyzeImagesUpload, AnalyzeImagesResponse))
)]
pub struct ImagesApi;

/// Register image routes (nested under `/api/images`).
///
/// `body_limit` replaces axum's 2 MB default so a full batch fits.
pub fn router(body_limit: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze", post(analyze_images))
        .layer(DefaultBodyLimit::max(body_limit))
}

#[utoipa::path(
    post,
    path = "/api/images/analyze",
    tag = "images",
    request_body(content = AnalyzeImagesUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Deduplicated ingredients", body = AnalyzeImagesResponse),
        (status = 400, description = "Not multipart, no images, too many images, or an image is too large"),
    )
)]
pub async fn analyze_images(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeImagesResponse>, ServerError> {
    let mut multipart = multipart?;
    let limits = state.images.limits();
    let mut images: Vec<Bytes> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        if field.name() != Some(IMAGES_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_owned();

        // Fail before buffering the rest of an over-long batch.
        limits.check_count(images.len() + 1)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Failed to read '{file_name}': {e}")))?;
        limits.check_size(&file_name, data.len())?;

        debug!(file_name = %file_name, bytes = data.len(), "image received");
        images.push(data);
    }

    let analysis = state.images.analyze(&images).await?;
    Ok(Json(AnalyzeImagesResponse {
        success: true,
        ingredients: analysis.ingredients,
        image_count: analysis.image_count,
    }))
}
