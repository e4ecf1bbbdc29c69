use thiserror::Error;

/// Errors raised by a single call to an external vision or text provider.
///
/// These never cross the crate boundary: the vision adapter and the provider
/// chain log them and fall back to a fixed value instead.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// An HTTP request failed (connection refused, TLS, body read, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Failed to decode the provider's JSON body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response decoded fine but carried no usable text.
    #[error("provider response contained no generated text")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(e)
        } else {
            ProviderError::Http(e)
        }
    }
}

/// Errors surfaced to callers of the chat and image-analysis operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    /// The referenced chat session does not exist.
    #[error("Chat session not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid request (empty batch, oversize image, ...).
    #[error("{0}")]
    Validation(String),
}
