//! Remote transcription via the Gemini generateContent API
//!
//! Sends the audio bytes inline (base64) together with a fixed
//! transcription instruction and returns the plain-text result.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Settings;
use crate::transcription::{TranscribeRequest, TranscriptionProvider};

const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const TRANSCRIBE_INSTRUCTION: &str =
    "Transcribe this audio recording. Return only the spoken words as plain text, \
     without timestamps, speaker labels, or commentary.";

pub struct GeminiTranscriber {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiTranscriber {
    /// Build a remote transcriber from the shared Gemini credentials.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "Gemini API key is missing. Set llm.api_key in config or RECAP_GEMINI_API_KEY."
            );
        }

        let model = match settings.llm.model.trim() {
            "" => DEFAULT_GEMINI_MODEL.to_string(),
            model => model.to_string(),
        };

        let endpoint = match settings.llm.endpoint.trim() {
            "" => DEFAULT_GEMINI_ENDPOINT.to_string(),
            endpoint => endpoint.trim_end_matches('/').to_string(),
        };

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .context("Failed to build Gemini HTTP client")?,
            api_key,
            model,
            endpoint,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

#[async_trait]
impl TranscriptionProvider for GeminiTranscriber {
    async fn transcribe(&self, request: TranscribeRequest<'_>) -> Result<String> {
        let audio = tokio::fs::read(request.audio_path).await.with_context(|| {
            format!("Failed to read upload: {}", request.audio_path.display())
        })?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart {
                        text: Some(TRANSCRIBE_INSTRUCTION.to_string()),
                        inline_data: None,
                    },
                    RequestPart {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: audio_mime_type(request.file_name).to_string(),
                            data: BASE64.encode(&audio),
                        }),
                    },
                ],
            }],
        };

        let response = self
            .http
            .post(self.request_url())
            .json(&body)
            .send()
            .await
            .context("Gemini transcription request failed")?;

        let response = response
            .error_for_status()
            .context("Gemini returned an error status")?;

        let payload: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        payload
            .candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .context("Gemini response did not contain transcript text")
    }
}

/// Guess the MIME type from the upload's file extension.
fn audio_mime_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("ogg") | Some("opus") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("aac") => "audio/aac",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_common_audio_mime_types() {
        assert_eq!(audio_mime_type("meeting.wav"), "audio/wav");
        assert_eq!(audio_mime_type("Interview.MP3"), "audio/mpeg");
        assert_eq!(audio_mime_type("note.m4a"), "audio/mp4");
        assert_eq!(audio_mime_type("unknown.bin"), "application/octet-stream");
        assert_eq!(audio_mime_type("no-extension"), "application/octet-stream");
    }

    #[test]
    fn request_serializes_inline_audio() {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart {
                        text: Some("transcribe".to_string()),
                        inline_data: None,
                    },
                    RequestPart {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "audio/wav".to_string(),
                            data: BASE64.encode(b"RIFF"),
                        }),
                    },
                ],
            }],
        };

        let json = serde_json::to_value(&body).expect("serialize request");
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "transcribe");
        assert!(parts[0].get("inline_data").is_none());
        assert_eq!(parts[1]["inline_data"]["mime_type"], "audio/wav");
    }
}
