//! Remote transcription and chat-completion backends.
//!
//! Provider selection is key-presence-driven: the first configured API key
//! wins, Groq before OpenAI. Both speak the OpenAI-compatible API shape, so
//! the concrete backends share one HTTP layer and differ only in endpoint
//! URLs and model names.

mod groq;
mod openai;
mod openai_compatible;

pub use groq::GroqBackend;
pub use openai::OpenAiBackend;

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::config::{ConfigError, Settings};

/// A finished audio buffer serialized and ready for upload.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio_data: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    pub language: String,
    pub temperature: f32,
}

impl TranscriptionRequest {
    /// Request for a WAV payload with the fixed decoding parameters the
    /// pipeline always uses: English, temperature 0.
    pub fn wav(audio_data: Vec<u8>) -> Self {
        Self {
            audio_data,
            filename: "audio.wav".to_string(),
            mime_type: "audio/wav".to_string(),
            language: "en".to_string(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The two remote capabilities the pipeline needs from a provider.
pub trait CloudBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Speech to text with deterministic decoding.
    fn transcribe(&self, request: TranscriptionRequest) -> Result<String>;

    /// Chat completion over the full message sequence.
    fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Pick the backend from whichever API key is configured, Groq first.
pub fn select_backend(settings: &Settings) -> Result<Arc<dyn CloudBackend>, ConfigError> {
    if let Some(key) = settings.groq_key() {
        return Ok(Arc::new(GroqBackend::new(key)));
    }
    if let Some(key) = settings.openai_key() {
        return Ok(Arc::new(OpenAiBackend::new(key)));
    }
    Err(ConfigError::MissingCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groq_key_wins_when_both_configured() {
        let settings = Settings {
            groq_api_key: Some("gsk_test".to_string()),
            openai_api_key: Some("sk-test".to_string()),
            ..Settings::default()
        };
        let backend = select_backend(&settings).unwrap();
        assert_eq!(backend.name(), "Groq");
    }

    #[test]
    fn openai_key_selected_when_configured() {
        let settings = Settings {
            openai_api_key: Some("sk-test".to_string()),
            ..Settings::default()
        };
        // GROQ_API_KEY in the environment would legitimately take precedence
        if std::env::var("GROQ_API_KEY").is_err() {
            let backend = select_backend(&settings).unwrap();
            assert_eq!(backend.name(), "OpenAI");
        }
    }

    #[test]
    fn messages_serialize_with_lowercase_roles() {
        let json = serde_json::to_string(&ChatMessage::system("hi")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);
    }
}
