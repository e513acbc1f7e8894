//! Shared HTTP layer for OpenAI-compatible APIs.
//!
//! Groq and OpenAI use identical request/response formats:
//! - transcription: multipart form upload with `model` and `file` fields
//! - chat: JSON message list to a completions endpoint
//! - authorization via `Bearer` token for both

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::{ChatMessage, TranscriptionRequest};
use crate::http::get_http_client;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

/// Transcribe audio via an OpenAI-compatible endpoint. The response format
/// is requested as plain text, so the body is the transcript itself.
pub(crate) fn openai_compatible_transcribe(
    api_url: &str,
    model: &str,
    api_key: &str,
    request: TranscriptionRequest,
) -> Result<String> {
    let client = get_http_client()?;

    let form = reqwest::blocking::multipart::Form::new()
        .text("model", model.to_string())
        .text("language", request.language)
        .text("temperature", request.temperature.to_string())
        .text("response_format", "text")
        .part(
            "file",
            reqwest::blocking::multipart::Part::bytes(request.audio_data)
                .file_name(request.filename)
                .mime_str(&request.mime_type)?,
        );

    let response = client
        .post(api_url)
        .header("Authorization", format!("Bearer {api_key}"))
        .multipart(form)
        .send()
        .context("failed to send transcription request")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .unwrap_or_else(|_| "unknown error".to_string());
        anyhow::bail!("transcription API error ({status}): {error_text}");
    }

    let text = response
        .text()
        .context("failed to read transcription response")?;
    Ok(text.trim().to_string())
}

/// Run a chat completion via an OpenAI-compatible endpoint.
pub(crate) fn openai_compatible_complete(
    api_url: &str,
    model: &str,
    api_key: &str,
    messages: &[ChatMessage],
) -> Result<String> {
    let client = get_http_client()?;

    let response = client
        .post(api_url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&serde_json::json!({
            "model": model,
            "messages": messages,
        }))
        .send()
        .context("failed to send completion request")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .unwrap_or_else(|_| "unknown error".to_string());
        anyhow::bail!("completion API error ({status}): {error_text}");
    }

    let chat_response: ChatResponse = response
        .json()
        .context("failed to parse completion response")?;
    chat_response
        .choices
        .first()
        .map(|choice| choice.message.content.clone())
        .ok_or_else(|| anyhow!("completion response contained no choices"))
}
