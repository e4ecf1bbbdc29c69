//! Chat session routes.
//!
//! Sessions are held in memory by [`pantry_core::ChatService`]; a user turn
//! carrying ingredients is answered through the recipe provider chain.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::extract::{ApiJson, ApiPath};
use crate::schemas::chat::{
    CreateChatResponse, HistoryResponse, MessageResponse, PreferencesBody, RefineRequest,
    SendMessageRequest, SendMessageResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(create_chat, send_message, get_history, refine_recipe),
    components(schemas(
        CreateChatResponse,
        SendMessageRequest,
        SendMessageResponse,
        HistoryResponse,
        MessageResponse,
        PreferencesBody,
        RefineRequest,
    ))
)]
pub struct ChatApi;

/// Register chat routes (nested under `/api/chat`).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(create_chat))
        .route("/{chat_id}/message", post(send_message))
        .route("/{chat_id}/history", get(get_history))
        .route("/{chat_id}/refine", post(refine_recipe))
}

#[utoipa::path(
    post,
    path = "/api/chat/create",
    tag = "chat",
    responses(
        (status = 200, description = "Chat session created", body = CreateChatResponse),
    )
)]
pub async fn create_chat(State(state): State<Arc<AppState>>) -> Json<CreateChatResponse> {
    let session = state.chat.create_chat().await;
    Json(CreateChatResponse::created(&session))
}

#[utoipa::path(
    post,
    path = "/api/chat/{chatId}/message",
    tag = "chat",
    params(("chatId" = String, Path, description = "Chat session ID")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Assistant reply", body = SendMessageResponse),
        (status = 400, description = "Malformed or mistyped request body"),
        (status = 404, description = "Chat session not found"),
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    ApiPath(chat_id): ApiPath<String>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ServerError> {
    debug!(
        %chat_id,
        ingredients = req.ingredients.as_ref().map_or(0, Vec::len),
        "chat message received"
    );

    let reply = state.chat.send_message(&chat_id, req.into()).await?;
    info!(%chat_id, reply_len = reply.content.len(), "assistant replied");

    Ok(Json(SendMessageResponse {
        success: true,
        message: reply.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/chat/{chatId}/history",
    tag = "chat",
    params(("chatId" = String, Path, description = "Chat session ID")),
    responses(
        (status = 200, description = "Messages in arrival order", body = HistoryResponse),
        (status = 404, description = "Chat session not found"),
    )
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    ApiPath(chat_id): ApiPath<String>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let messages = state.chat.history(&chat_id).await?;
    Ok(Json(HistoryResponse {
        success: true,
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

/// Revise the latest (or a supplied) recipe from user feedback.
#[utoipa::path(
    post,
    path = "/api/chat/{chatId}/refine",
    tag = "chat",
    params(("chatId" = String, Path, description = "Chat session ID")),
    request_body = RefineRequest,
    responses(
        (status = 200, description = "Refined recipe", body = SendMessageResponse),
        (status = 400, description = "Empty feedback or nothing to refine"),
        (status = 404, description = "Chat session not found"),
    )
)]
pub async fn refine_recipe(
    State(state): State<Arc<AppState>>,
    ApiPath(chat_id): ApiPath<String>,
    ApiJson(req): ApiJson<RefineRequest>,
) -> Result<Json<SendMessageResponse>, ServerError> {
    let reply = state
        .chat
        .refine(&chat_id, &req.feedback, req.recipe.as_deref())
        .await?;
    Ok(Json(SendMessageResponse {
        success: true,
        message: reply.into(),
    }))
}
