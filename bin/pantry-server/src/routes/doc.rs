use utoipa::OpenApi;

use super::{chat, health, images};

#[derive(OpenApi)]
#[openapi(info(
    title = "pantry-server",
    description = "Identify ingredients in photos and chat about recipes",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(chat::ChatApi::openapi());
    root.merge(images::ImagesApi::openapi());
    root
}
