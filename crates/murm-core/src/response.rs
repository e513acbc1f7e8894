//! Stateful LLM conversation wrapper for Edit mode.
//!
//! The rolling history is the only deliberately process-scoped state in the
//! pipeline: it lives for the lifetime of the service, is bounded to the
//! most recent entries, and has a single writer (the controller thread), so
//! it needs no locking. Bounding it keeps context growth and API cost flat
//! while still giving multi-turn "keep editing this" continuity without an
//! explicit session concept.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::provider::{ChatMessage, CloudBackend};

/// History bound, counted in entries (user + assistant), i.e. five full
/// exchanges.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Returned in place of a completion when the chat call fails.
pub const COMPLETION_FALLBACK_MESSAGE: &str =
    "Sorry, I couldn't generate a response. Please try again.";

const SYSTEM_PROMPT: &str = "Respond to the prompt, using the highlighted text as context \
if provided. Return only the replacement or response text, with no surrounding quotes, \
markdown fences, or commentary. When asked to edit code, return the full rewritten \
document, not a diff.";

pub struct ResponseService {
    backend: Arc<dyn CloudBackend>,
    history: VecDeque<ChatMessage>,
    history_limit: usize,
}

impl ResponseService {
    pub fn new(backend: Arc<dyn CloudBackend>) -> Self {
        Self::with_history_limit(backend, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(backend: Arc<dyn CloudBackend>, history_limit: usize) -> Self {
        Self {
            backend,
            history: VecDeque::new(),
            history_limit,
        }
    }

    pub fn history(&self) -> &VecDeque<ChatMessage> {
        &self.history
    }

    /// Run one conversational turn.
    ///
    /// The user turn is appended to history before the call, and stays there
    /// even when the completion fails, so callers must tolerate one-sided
    /// entries; the failed completion itself is never appended.
    pub fn respond(&mut self, highlighted_text: &str, prompt: &str) -> String {
        let turn = build_turn(highlighted_text, prompt);
        self.push(ChatMessage::user(turn));

        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(self.history.iter().cloned());

        match self.backend.complete(&messages) {
            Ok(reply) => {
                let reply = reply.trim().to_string();
                self.push(ChatMessage::assistant(reply.clone()));
                reply
            }
            Err(e) => {
                eprintln!("Failed to generate response: {e:#}");
                COMPLETION_FALLBACK_MESSAGE.to_string()
            }
        }
    }

    fn push(&mut self, message: ChatMessage) {
        self.history.push_back(message);
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }
}

/// Build the user turn from whichever inputs are present. Neither being
/// present substitutes a placeholder rather than failing.
fn build_turn(highlighted_text: &str, prompt: &str) -> String {
    match (highlighted_text.is_empty(), prompt.is_empty()) {
        (false, false) => {
            format!("Highlighted text:\n{highlighted_text}\n\nUser prompt:\n{prompt}")
        }
        (false, true) => highlighted_text.to_string(),
        (true, false) => prompt.to_string(),
        (true, true) => "no input provided".to_string(),
    }
}
