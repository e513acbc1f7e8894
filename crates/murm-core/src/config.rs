//! Settings loaded once at process start, read-only afterwards.
//!
//! Sources, in order: the JSON settings file (default
//! `~/.config/murm/settings.json`, overridable with `--config`), then the
//! `GROQ_API_KEY` / `OPENAI_API_KEY` environment variables for API keys. A
//! missing file is not an error; missing credentials are fatal at startup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "no transcription API key configured; set groq_api_key or openai_api_key in the settings file, or the GROQ_API_KEY / OPENAI_API_KEY environment variables"
    )]
    MissingCredentials,
    #[error("unrecognized hotkey name: {0}")]
    UnknownHotkey(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub groq_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    /// Press enter after pasting a dictation transcript.
    pub auto_submit: bool,
    /// Pipe the raw transcript through a single LLM cleanup turn.
    pub clean_transcription: bool,
    /// Hold-to-dictate hotkey name.
    pub dictation_hotkey: String,
    /// Hold-to-edit hotkey name.
    pub edit_hotkey: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            openai_api_key: None,
            auto_submit: false,
            clean_transcription: false,
            dictation_hotkey: "f9".to_string(),
            edit_hotkey: "f10".to_string(),
        }
    }
}

impl Settings {
    /// Default settings file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("murm").join("settings.json"))
    }

    /// Load settings from `path`, or from the default location when `None`.
    /// A missing file yields defaults so API keys can still come from the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            crate::verbose!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Groq API key from the settings file or environment.
    pub fn groq_key(&self) -> Option<String> {
        self.groq_api_key
            .clone()
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }

    /// OpenAI API key from the settings file or environment.
    pub fn openai_key(&self) -> Option<String> {
        self.openai_api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }
}
