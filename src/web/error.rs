//! Error types for the web layer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors surfaced as HTTP responses.
///
/// Provider failures never land here: they are rendered inline in the
/// results page with a success status.
#[derive(Debug, Error)]
pub enum WebError {
    /// Malformed upload (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// IO error while persisting the upload (500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else (500)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Io(_) | WebError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!("Request failed: {}", self);

        (status, self.to_string()).into_response()
    }
}
