//! Buffer-to-text pipeline: WAV serialization, upload, optional LLM cleanup.
//!
//! Every failure in here degrades to an empty string so callers can treat it
//! as "nothing to do"; a dictation that fails to transcribe should be
//! silence, not a crash.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::audio::AudioBuffer;
use crate::provider::{ChatMessage, CloudBackend, TranscriptionRequest};

const CLEANUP_PROMPT: &str = "Clean up the transcription. Fix transcription errors and \
punctuation while preserving the user's intent and wording. Output only the corrected \
text, no explanations.";

pub struct TranscriptionService {
    backend: Arc<dyn CloudBackend>,
    clean_with_llm: bool,
}

impl TranscriptionService {
    pub fn new(backend: Arc<dyn CloudBackend>, clean_with_llm: bool) -> Self {
        Self {
            backend,
            clean_with_llm,
        }
    }

    /// Transcribe a finished recording. Failures are logged and collapse to
    /// an empty string.
    pub fn transcribe(&self, buffer: &AudioBuffer) -> String {
        match self.request_transcript(buffer) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Failed to transcribe audio: {e:#}");
                String::new()
            }
        }
    }

    fn request_transcript(&self, buffer: &AudioBuffer) -> Result<String> {
        // NamedTempFile is removed on drop, so the on-disk WAV never
        // outlives this call, success or failure.
        let wav_file = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .context("failed to create temporary WAV file")?;
        buffer.write_wav(wav_file.path())?;
        let audio_data =
            std::fs::read(wav_file.path()).context("failed to read temporary WAV file")?;

        let raw = self.backend.transcribe(TranscriptionRequest::wav(audio_data))?;
        crate::verbose!("transcription: {raw}");

        if !self.clean_with_llm || raw.is_empty() {
            return Ok(raw);
        }
        Ok(self.clean_transcript(raw))
    }

    /// Single-turn cleanup pass. A failed cleanup falls back to the raw
    /// transcript rather than failing the whole call.
    fn clean_transcript(&self, raw: String) -> String {
        let messages = [
            ChatMessage::system(CLEANUP_PROMPT),
            ChatMessage::user(format!("Transcription: {raw}")),
        ];
        match self.backend.complete(&messages) {
            Ok(cleaned) => {
                let cleaned = cleaned.trim().to_string();
                crate::verbose!("cleaned transcription: {cleaned}");
                cleaned
            }
            Err(e) => {
                eprintln!("Failed to clean transcription: {e:#}");
                raw
            }
        }
    }
}

/// Derived per-recording stats, logged after a successful dictation. Never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptStats {
    pub word_count: usize,
    pub elapsed_secs: f32,
}

impl TranscriptStats {
    pub fn new(text: &str, elapsed_secs: f32) -> Self {
        Self {
            word_count: text.split_whitespace().count(),
            elapsed_secs,
        }
    }

    pub fn words_per_minute(&self) -> f32 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.word_count as f32 / self.elapsed_secs * 60.0
    }
}
