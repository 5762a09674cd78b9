//! Whisper transcription using whisper-rs
//!
//! The model is loaded once at startup and shared read-only across
//! requests; each request gets its own inference state.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::Settings;
use crate::transcription::{TranscribeRequest, TranscriptionProvider};

/// Whisper-based transcriber
pub struct WhisperTranscriber {
    ctx: Arc<WhisperContext>,
    language: Option<String>,
    translate: bool,
}

impl WhisperTranscriber {
    /// Create a new transcriber with the configured model
    pub fn new(settings: &Settings) -> Result<Self> {
        let model_path = settings.model_path();

        if !model_path.exists() {
            anyhow::bail!(
                "Whisper model not found at {}. Download a ggml model (e.g. ggml-{}.bin) \
                 and place it in {}.",
                model_path.display(),
                settings.whisper.model,
                settings.whisper.models_dir.display()
            );
        }

        let model_path = model_path
            .to_str()
            .context("Whisper model path is not valid UTF-8")?;

        let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
            .context("Failed to load Whisper model")?;

        let language = if settings.whisper.language.is_empty() {
            None
        } else {
            Some(settings.whisper.language.clone())
        };

        Ok(Self {
            ctx: Arc::new(ctx),
            language,
            translate: settings.whisper.translate,
        })
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperTranscriber {
    async fn transcribe(&self, request: TranscribeRequest<'_>) -> Result<String> {
        let samples = load_audio(request.audio_path)?;

        let ctx = Arc::clone(&self.ctx);
        let language = self.language.clone();
        let translate = self.translate;

        // Inference is CPU-bound; keep it off the async workers.
        let text = tokio::task::spawn_blocking(move || -> Result<String> {
            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_print_special(false);
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);
            params.set_translate(translate);

            if let Some(ref lang) = language {
                params.set_language(Some(lang));
            }

            let mut state = ctx.create_state().context("Failed to create Whisper state")?;
            state
                .full(params, &samples)
                .context("Whisper inference failed")?;

            let num_segments = state
                .full_n_segments()
                .context("Failed to get segment count")?;

            let mut text = String::new();
            for i in 0..num_segments {
                let segment = state
                    .full_get_segment_text(i)
                    .context("Failed to get segment text")?;
                let segment = segment.trim();
                if segment.is_empty() {
                    continue;
                }
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(segment);
            }

            Ok(text)
        })
        .await
        .context("Whisper inference task failed")??;

        tracing::info!("Transcribed {} ({} chars)", request.file_name, text.len());

        Ok(text)
    }
}

/// Load audio from a WAV file as f32 samples at 16kHz mono
fn load_audio(path: &Path) -> Result<Vec<f32>> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let spec = reader.spec();
    tracing::debug!(
        "Loading audio: {} Hz, {} channels, {:?}",
        spec.sample_rate,
        spec.channels,
        spec.sample_format
    );

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .filter_map(|s| s.ok())
            .map(|s| s as f32 / 32768.0)
            .collect(),
        (hound::SampleFormat::Int, 32) => reader
            .into_samples::<i32>()
            .filter_map(|s| s.ok())
            .map(|s| s as f32 / 2147483648.0)
            .collect(),
        (hound::SampleFormat::Float, 32) => {
            reader.into_samples::<f32>().filter_map(|s| s.ok()).collect()
        }
        _ => anyhow::bail!(
            "Unsupported audio format: {:?} {}bit. Upload a 16/32-bit WAV file.",
            spec.sample_format,
            spec.bits_per_sample
        ),
    };

    let samples = mix_to_mono(samples, spec.channels as usize);

    // Whisper expects 16kHz input
    if spec.sample_rate == 16000 {
        Ok(samples)
    } else {
        Ok(resample(&samples, spec.sample_rate, 16000))
    }
}

fn mix_to_mono(samples: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Simple linear resampling
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio) as usize;
    let mut result = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = match (samples.get(src_idx), samples.get(src_idx + 1)) {
            (Some(&a), Some(&b)) => a * (1.0 - frac) + b * frac,
            (Some(&a), None) => a,
            _ => 0.0,
        };
        result.push(sample);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixes_stereo_to_mono() {
        let mixed = mix_to_mono(vec![0.0, 1.0, 0.5, 0.5], 2);
        assert_eq!(mixed, vec![0.5, 0.5]);
    }

    #[test]
    fn resample_halves_length_for_double_rate() {
        let samples = vec![0.0; 32000];
        let resampled = resample(&samples, 32000, 16000);
        assert_eq!(resampled.len(), 16000);
    }

    #[test]
    fn load_audio_rejects_non_wav_content() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("not-audio.wav");
        std::fs::write(&path, b"definitely not a RIFF header").expect("write file");

        assert!(load_audio(&path).is_err());
    }

    #[test]
    fn load_audio_reads_16bit_wav() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("tone.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("create wav");
        for i in 0..1600i16 {
            writer.write_sample(i).expect("write sample");
        }
        writer.finalize().expect("finalize wav");

        let samples = load_audio(&path).expect("load wav");
        assert_eq!(samples.len(), 1600);
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}
