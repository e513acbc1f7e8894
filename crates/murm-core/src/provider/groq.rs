//! Groq backend (OpenAI-compatible API surface).

use anyhow::Result;

use super::openai_compatible::{openai_compatible_complete, openai_compatible_transcribe};
use super::{ChatMessage, CloudBackend, TranscriptionRequest};

const TRANSCRIPTION_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";
const CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const TRANSCRIPTION_MODEL: &str = "distil-whisper-large-v3-en";
const CHAT_MODEL: &str = "llama-3.1-70b-versatile";

pub struct GroqBackend {
    api_key: String,
}

impl GroqBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl CloudBackend for GroqBackend {
    fn name(&self) -> &'static str {
        "Groq"
    }

    fn transcribe(&self, request: TranscriptionRequest) -> Result<String> {
        openai_compatible_transcribe(TRANSCRIPTION_URL, TRANSCRIPTION_MODEL, &self.api_key, request)
    }

    fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        openai_compatible_complete(CHAT_URL, CHAT_MODEL, &self.api_key, messages)
    }
}
