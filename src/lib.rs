//! recap - A lightweight web app for audio transcription and AI-powered summaries
//!
//! Upload an audio file, read the transcript and a short summary, done.
//! Uploads are transient: every file is removed when its request finishes.

pub mod config;
pub mod llm;
pub mod transcription;
pub mod web;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "recap";
