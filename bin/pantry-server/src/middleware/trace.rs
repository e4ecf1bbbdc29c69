use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::state::AppState;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies at or below this size are logged verbatim.
const MAX_LOGGED_BODY: usize = 1024;

/// Wrap each request in an `http_request` span keyed by `x-trace-id`.
///
/// The incoming trace ID is reused when it parses as a UUID; otherwise a new
/// one is generated. Either way it is echoed on the response.
pub async fn trace_middleware(
    State(_state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let trace_header = HeaderValue::from_str(&trace_id.to_string()).ok();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");

        let (parts, body) = req.into_parts();
        let body = log_json_body("request", &parts.headers, body).await;
        let mut req = Request::from_parts(parts, body);
        if let Some(v) = &trace_header {
            req.headers_mut().insert(X_TRACE_ID, v.clone());
        }

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();
        let body = log_json_body("response", &parts.headers, body).await;
        let mut response = Response::from_parts(parts, body);
        if let Some(v) = trace_header {
            response.headers_mut().insert(X_TRACE_ID, v);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

/// Log small JSON bodies verbatim; anything else streams through untouched.
///
/// Only bodies whose exact length is known and at most [`MAX_LOGGED_BODY`]
/// are buffered, so an oversized or chunked upload is never held in memory
/// here ahead of the route's own body limit.
async fn log_json_body(direction: &str, headers: &HeaderMap, body: Body) -> Body {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if !is_json {
        return body;
    }

    match body.size_hint().exact() {
        Some(len) if len <= MAX_LOGGED_BODY as u64 => {}
        Some(len) => {
            info!("{direction} body: [skipped: {len} bytes]");
            return body;
        }
        None => {
            info!("{direction} body: [skipped: length unknown]");
            return body;
        }
    }

    let bytes: Bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "{direction} body could not be read");
            return Body::empty();
        }
    };
    if let Ok(text) = std::str::from_utf8(&bytes) {
        info!("{direction} body: {text}");
    }
    Body::from(bytes)
}
