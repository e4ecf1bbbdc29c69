//! Request extractors whose rejections answer in the [`ServerError`] format.
//!
//! axum's own `Json` and `Path` reject with plain-text bodies and, for a
//! mistyped field, status 422. Handlers take these wrappers instead so every
//! malformed request is a 400 `{"success": false, "message": ...}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServerError;

/// [`axum::Json`] with its rejection mapped to [`ServerError::BadRequest`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

/// [`axum::extract::Path`] with its rejection mapped to [`ServerError::BadRequest`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct ApiPath<T>(pub T);
