//! OpenAI backend.

use anyhow::Result;

use super::openai_compatible::{openai_compatible_complete, openai_compatible_transcribe};
use super::{ChatMessage, CloudBackend, TranscriptionRequest};

const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const TRANSCRIPTION_MODEL: &str = "whisper-1";
const CHAT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAiBackend {
    api_key: String,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl CloudBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn transcribe(&self, request: TranscriptionRequest) -> Result<String> {
        openai_compatible_transcribe(TRANSCRIPTION_URL, TRANSCRIPTION_MODEL, &self.api_key, request)
    }

    fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        openai_compatible_complete(CHAT_URL, CHAT_MODEL, &self.api_key, messages)
    }
}
