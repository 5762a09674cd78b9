//! LLM module for recap
//!
//! Handles AI-powered transcript summaries using the Gemini API.

mod client;
mod gemini;
mod prompts;

pub use client::{build_provider, LlmProvider, SummaryRequest};
pub use gemini::GeminiClient;
