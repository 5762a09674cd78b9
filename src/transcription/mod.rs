//! Transcription module for recap
//!
//! Converts uploaded audio files into plain-text transcripts, either with a
//! locally loaded whisper model or a remote Gemini call.

mod gemini;
mod whisper;

pub use gemini::GeminiTranscriber;
pub use whisper::WhisperTranscriber;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::config::Settings;

/// Transcription request payload.
pub struct TranscribeRequest<'a> {
    /// Where the upload was persisted
    pub audio_path: &'a Path,
    /// Client-supplied file name, used for MIME detection and prompts
    pub file_name: &'a str,
}

#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(&self, request: TranscribeRequest<'_>) -> Result<String>;
}

/// Build a transcription provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn TranscriptionProvider>> {
    match settings.transcription.provider.to_lowercase().as_str() {
        "whisper" => Ok(Box::new(WhisperTranscriber::new(settings)?)),
        "gemini" => Ok(Box::new(GeminiTranscriber::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported transcription.provider '{}'. Supported providers: whisper, gemini",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn unsupported_provider_returns_error() {
        let mut settings = Settings::default();
        settings.transcription.provider = "unknown".to_string();

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Unsupported transcription.provider"));
    }

    #[test]
    fn whisper_provider_requires_model_file() {
        let mut settings = Settings::default();
        settings.whisper.models_dir = std::path::PathBuf::from("/nonexistent/models");

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Whisper model not found"));
    }

    #[test]
    fn gemini_provider_requires_api_key() {
        let mut settings = Settings::default();
        settings.transcription.provider = "gemini".to_string();

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Gemini API key is missing"));
    }
}
