//! Upload handling
//!
//! Receives the audio form submission, runs the transcription and
//! summarization providers, and removes the stored upload on every exit
//! path.

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Redirect, Response};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::llm::SummaryRequest;
use crate::transcription::TranscribeRequest;
use crate::web::pages::render_page;
use crate::web::{AppState, WebError};

const UPLOAD_FIELD: &str = "audio_file";

/// POST / - accept the form upload and render the results page
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| WebError::BadRequest(e.to_string()))?;
        upload = Some((file_name, data.to_vec()));
        break;
    }

    // Missing field or empty file name: back to the form, nothing processed.
    let Some((raw_name, data)) = upload else {
        return Ok(Redirect::to("/").into_response());
    };
    let Some(file_name) = sanitize_file_name(&raw_name) else {
        return Ok(Redirect::to("/").into_response());
    };

    let guard = UploadGuard::persist(&state.settings.uploads.dir, &file_name, &data).await?;

    let (transcript, summary) = process(&state, guard.path(), &file_name).await;

    Ok(render_page(Some(&transcript), Some(&summary)).into_response())
}

/// Run the provider pipeline. Failures become page text, never HTTP errors.
async fn process(state: &AppState, audio_path: &Path, file_name: &str) -> (String, String) {
    match run_pipeline(state, audio_path, file_name).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Processing failed for {}: {:#}", file_name, e);
            (format!("An error occurred: {e:#}"), "Processing failed.".to_string())
        }
    }
}

async fn run_pipeline(
    state: &AppState,
    audio_path: &Path,
    file_name: &str,
) -> anyhow::Result<(String, String)> {
    let transcript = state
        .transcriber
        .transcribe(TranscribeRequest {
            audio_path,
            file_name,
        })
        .await?;

    if transcript.trim().is_empty() {
        return Ok((
            "Transcription failed.".to_string(),
            "No summary generated.".to_string(),
        ));
    }

    let summary = state
        .summarizer
        .summarize(SummaryRequest {
            title: file_name,
            transcript: &transcript,
        })
        .await?;

    Ok((transcript, summary))
}

/// Reduce a client-supplied name to a safe final path component.
fn sanitize_file_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Path::file_name handles Unix separators; strip Windows ones by hand.
    let name = Path::new(trimmed).file_name()?.to_str()?;
    let name = name.rsplit('\\').next()?.trim();

    if name.is_empty() || name == "." || name == ".." {
        return None;
    }

    Some(name.to_string())
}

/// Scoped storage for one upload. The file and its scope directory are
/// removed when the guard drops, whichever way the request ends.
struct UploadGuard {
    path: PathBuf,
    scope_dir: PathBuf,
}

impl UploadGuard {
    async fn persist(uploads_dir: &Path, file_name: &str, data: &[u8]) -> Result<Self, WebError> {
        let scope_dir = uploads_dir.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&scope_dir).await?;

        let path = scope_dir.join(file_name);
        if let Err(e) = tokio::fs::write(&path, data).await {
            // The scope dir exists but the file never landed; drop would
            // only log, so clean up eagerly and fail the request.
            let _ = std::fs::remove_dir_all(&scope_dir);
            return Err(WebError::Io(e));
        }

        tracing::info!("Stored upload {} ({} bytes)", path.display(), data.len());

        Ok(Self { path, scope_dir })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove upload {}: {}", self.path.display(), e);
            }
        }
        if let Err(e) = std::fs::remove_dir(&self.scope_dir) {
            tracing::warn!(
                "Failed to remove upload dir {}: {}",
                self.scope_dir.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_file_name("meeting.wav").as_deref(), Some("meeting.wav"));
        assert_eq!(
            sanitize_file_name("  spaced.mp3  ").as_deref(),
            Some("spaced.mp3")
        );
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(
            sanitize_file_name("/etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_file_name("../../escape.wav").as_deref(),
            Some("escape.wav")
        );
        assert_eq!(
            sanitize_file_name(r"C:\Users\me\note.m4a").as_deref(),
            Some("note.m4a")
        );
    }

    #[test]
    fn sanitize_rejects_empty_and_dot_names() {
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name("   "), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("/"), None);
    }

    #[tokio::test]
    async fn guard_removes_file_and_scope_dir_on_drop() {
        let uploads = tempfile::tempdir().expect("create temp dir");

        let guard = UploadGuard::persist(uploads.path(), "clip.wav", b"RIFF")
            .await
            .expect("persist upload");
        let stored = guard.path().to_path_buf();
        assert!(stored.exists());

        drop(guard);

        assert!(!stored.exists());
        assert_eq!(
            std::fs::read_dir(uploads.path()).unwrap().count(),
            0,
            "scope directory should be removed"
        );
    }
}
