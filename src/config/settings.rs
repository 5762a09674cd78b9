//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Transient upload storage settings
    #[serde(default)]
    pub uploads: UploadSettings,

    /// Transcription backend selection
    #[serde(default)]
    pub transcription: TranscriptionSettings,

    /// Whisper transcription settings
    #[serde(default)]
    pub whisper: WhisperSettings,

    /// LLM settings
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Working directory for transient uploads
    #[serde(default = "default_uploads_dir")]
    pub dir: PathBuf,

    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Transcription provider (whisper, gemini)
    #[serde(default = "default_transcription_provider")]
    pub provider: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSettings {
    /// Whisper model to use (tiny, base, small, medium, large)
    #[serde(default = "default_model")]
    pub model: String,

    /// Path to model files directory
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Language for transcription (empty = auto-detect)
    #[serde(default)]
    pub language: String,

    /// Enable translation to English
    #[serde(default)]
    pub translate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (gemini)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key (for cloud providers)
    #[serde(default)]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API endpoint (for custom deployments)
    #[serde(default)]
    pub endpoint: String,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "recap", "recap")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/recap"))
}

fn default_uploads_dir() -> PathBuf {
    let mut dir = default_data_dir();
    dir.push("uploads");
    dir
}

fn default_models_dir() -> PathBuf {
    let mut dir = default_data_dir();
    dir.push("models");
    dir
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_transcription_provider() -> String {
    "whisper".to_string()
}

fn default_model() -> String {
    "base".to_string()
}

fn default_llm_provider() -> String {
    "gemini".to_string()
}

fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            dir: default_uploads_dir(),
            max_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            provider: default_transcription_provider(),
        }
    }
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            models_dir: default_models_dir(),
            language: String::new(),
            translate: false,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: String::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            uploads: UploadSettings::default(),
            transcription: TranscriptionSettings::default(),
            whisper: WhisperSettings::default(),
            llm: LlmSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings, preferring an explicit path over the platform config file
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        let config_path = match path_override {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    tracing::info!("No config file found, using defaults");
                    let mut settings = Self::default();
                    settings.apply_env_overrides();
                    return Ok(settings);
                }
                path
            }
        };

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if self.llm.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("RECAP_GEMINI_API_KEY") {
                if !key.trim().is_empty() {
                    self.llm.api_key = key;
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "recap", "recap")
            .context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.uploads.dir).with_context(|| {
            format!("Failed to create uploads dir: {}", self.uploads.dir.display())
        })?;
        std::fs::create_dir_all(&self.whisper.models_dir)?;
        Ok(())
    }

    /// Get the path to the whisper model file
    pub fn model_path(&self) -> PathBuf {
        self.whisper
            .models_dir
            .join(format!("ggml-{}.bin", self.whisper.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_whisper_and_gemini_25_flash() {
        let settings = Settings::default();
        assert_eq!(settings.transcription.provider, "whisper");
        assert_eq!(settings.llm.model, "gemini-2.5-flash");
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn partial_config_keeps_section_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[server]
port = 8080

[llm]
api_key = "test-key"
"#,
        )
        .expect("partial config should parse");

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.llm.api_key, "test-key");
        assert_eq!(settings.llm.model, "gemini-2.5-flash");
        assert_eq!(settings.transcription.provider, "whisper");
    }

    #[test]
    fn model_path_uses_model_name() {
        let mut settings = Settings::default();
        settings.whisper.model = "small".to_string();
        settings.whisper.models_dir = PathBuf::from("/tmp/models");
        assert_eq!(settings.model_path(), PathBuf::from("/tmp/models/ggml-small.bin"));
    }

    #[test]
    fn load_rejects_missing_explicit_config() {
        let err = Settings::load(Some(Path::new("/does/not/exist.toml")))
            .expect_err("missing explicit config should fail");
        assert!(err.to_string().contains("Config file not found"));
    }
}
