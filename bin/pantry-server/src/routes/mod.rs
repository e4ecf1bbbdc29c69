//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, panic-to-500 conversion, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with `PANTRY_ENABLE_SWAGGER=false`)
//! - Health route
//! - `/api/chat` and `/api/images` routes

mod chat;
pub mod doc;
mod health;
mod images;

use std::sync::Arc;

use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::panic_response;
use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .nest("/chat", chat::router())
        .nest("/images", images::router(state.config.body_limit()));

    let mut app = Router::new()
        .merge(health::router())
        .nest("/api", api_router);

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(
            ServiceBuilder::new()
                .layer(cors::cors_layer(state.clone()))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trace::trace_middleware,
        ))
        .with_state(state)
}
