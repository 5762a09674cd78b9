//! Web module for recap
//!
//! Axum routes, shared application state, and page rendering.

mod error;
mod pages;
mod upload;

pub use error::WebError;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::llm::LlmProvider;
use crate::transcription::TranscriptionProvider;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub transcriber: Arc<dyn TranscriptionProvider>,
    pub summarizer: Arc<dyn LlmProvider>,
}

impl AppState {
    pub fn new(
        settings: Arc<Settings>,
        transcriber: Arc<dyn TranscriptionProvider>,
        summarizer: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            settings,
            transcriber,
            summarizer,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.settings.uploads.max_bytes;

    Router::new()
        .route("/", get(pages::index).post(upload::handle_upload))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}
