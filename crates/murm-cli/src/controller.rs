//! The dictation/edit state machine.
//!
//! One foreground loop drives this controller; every handler runs to
//! completion before the next hotkey event is taken, so the stop,
//! transcribe, paste sequence is never interleaved with another session.
//! Only audio capture itself runs concurrently, and `Recorder::stop` joins
//! it before the buffer is read.

use murm_core::{
    FinishedRecording, Recorder, RecordingMode, ResponseService, TextInjector, TranscriptStats,
    TranscriptionService,
};

/// Controller phases. `Processing` only exists inside a key-up handler (the
/// network calls block it), but is kept explicit so the state is observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Recording(RecordingMode),
    Processing,
}

pub struct DictationController {
    state: ControllerState,
    recorder: Recorder,
    injector: Box<dyn TextInjector>,
    transcriber: TranscriptionService,
    responder: ResponseService,
    auto_submit: bool,
    /// Highlight captured for the current Edit press. Some/None doubles as
    /// the "already captured" flag that guards key-repeat events.
    highlight: Option<String>,
}

impl DictationController {
    pub fn new(
        recorder: Recorder,
        injector: Box<dyn TextInjector>,
        transcriber: TranscriptionService,
        responder: ResponseService,
        auto_submit: bool,
    ) -> Self {
        Self {
            state: ControllerState::Idle,
            recorder,
            injector,
            transcriber,
            responder,
            auto_submit,
            highlight: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Key-down for either hotkey. While any recording is active this is a
    /// no-op, which covers both OS key-repeat for the held hotkey and a
    /// press of the other hotkey mid-recording.
    pub fn on_key_down(&mut self, mode: RecordingMode) {
        if self.recorder.is_recording() {
            return;
        }

        if mode == RecordingMode::Edit && self.highlight.is_none() {
            let captured = match self.injector.capture_highlight() {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Failed to capture highlighted text: {e:#}");
                    String::new()
                }
            };
            if let Err(e) = self.injector.delete_selection() {
                eprintln!("Failed to delete selection: {e:#}");
            }
            self.highlight = Some(captured);
        }

        if let Err(e) = self.recorder.start(mode) {
            eprintln!("Failed to start recording: {e:#}");
            if mode == RecordingMode::Edit {
                self.highlight = None;
            }
            return;
        }
        self.state = ControllerState::Recording(mode);
    }

    /// Key-up for either hotkey. A release for a mode other than the active
    /// recording is ignored; a sub-threshold recording goes straight back to
    /// idle with no side effects.
    pub fn on_key_up(&mut self, mode: RecordingMode) {
        let Some(recording) = self.recorder.stop(mode) else {
            if !self.recorder.is_recording() {
                self.state = ControllerState::Idle;
                if mode == RecordingMode::Edit {
                    self.highlight = None;
                }
            }
            return;
        };

        self.state = ControllerState::Processing;
        match mode {
            RecordingMode::Dictation => self.finish_dictation(recording),
            RecordingMode::Edit => self.finish_edit(recording),
        }
        self.state = ControllerState::Idle;
    }

    fn finish_dictation(&mut self, recording: FinishedRecording) {
        let transcript = self.transcriber.transcribe(&recording.buffer);
        if transcript.is_empty() {
            return;
        }

        let stats = TranscriptStats::new(&transcript, recording.elapsed_secs);
        println!(
            "Total time: {:.2} secs | WPM: {:.2}",
            stats.elapsed_secs,
            stats.words_per_minute()
        );

        if let Err(e) = self.injector.paste(&transcript) {
            eprintln!("Failed to paste transcript: {e:#}");
            return;
        }
        if self.auto_submit {
            if let Err(e) = self.injector.press_enter() {
                eprintln!("Failed to auto-submit: {e:#}");
            }
        }
    }

    fn finish_edit(&mut self, recording: FinishedRecording) {
        // Take the highlight first so the captured flag resets even when the
        // transcript comes back empty.
        let highlight = self.highlight.take().unwrap_or_default();

        let transcript = self.transcriber.transcribe(&recording.buffer);
        if transcript.is_empty() {
            return;
        }

        let reply = self.responder.respond(&highlight, &transcript);
        if reply.is_empty() {
            return;
        }
        if let Err(e) = self.injector.paste(&reply) {
            eprintln!("Failed to paste response: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use murm_core::{AudioBuffer, ChatMessage, CloudBackend, TranscriptionRequest};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct OpsLog(Arc<Mutex<Vec<String>>>);

    impl OpsLog {
        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FakeInjector {
        highlight: String,
        ops: OpsLog,
    }

    impl TextInjector for FakeInjector {
        fn capture_highlight(&mut self) -> Result<String> {
            self.ops.0.lock().unwrap().push("capture".to_string());
            Ok(self.highlight.clone())
        }

        fn delete_selection(&mut self) -> Result<()> {
            self.ops.0.lock().unwrap().push("backspace".to_string());
            Ok(())
        }

        fn paste(&mut self, text: &str) -> Result<()> {
            self.ops.0.lock().unwrap().push(format!("paste:{text}"));
            Ok(())
        }

        fn press_enter(&mut self) -> Result<()> {
            self.ops.0.lock().unwrap().push("enter".to_string());
            Ok(())
        }
    }

    struct FakeBackend {
        transcript: Option<String>,
        completion: Option<String>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl FakeBackend {
        fn new(transcript: Option<&str>, completion: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                transcript: transcript.map(String::from),
                completion: completion.map(String::from),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl CloudBackend for FakeBackend {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn transcribe(&self, _request: TranscriptionRequest) -> Result<String> {
            self.transcript
                .clone()
                .ok_or_else(|| anyhow::anyhow!("transport down"))
        }

        fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.completion
                .clone()
                .ok_or_else(|| anyhow::anyhow!("transport down"))
        }
    }

    fn controller(
        backend: Arc<FakeBackend>,
        highlight: &str,
        auto_submit: bool,
    ) -> (DictationController, OpsLog) {
        let ops = OpsLog::default();
        let injector = FakeInjector {
            highlight: highlight.to_string(),
            ops: ops.clone(),
        };
        let controller = DictationController::new(
            Recorder::new(),
            Box::new(injector),
            TranscriptionService::new(backend.clone(), false),
            ResponseService::new(backend),
            auto_submit,
        );
        (controller, ops)
    }

    fn recording() -> FinishedRecording {
        FinishedRecording {
            buffer: AudioBuffer::new(vec![0.1; 44_100], 44_100),
            elapsed_secs: 1.0,
        }
    }

    #[test]
    fn dictation_pastes_the_exact_transcript() {
        let backend = FakeBackend::new(Some("hello world"), None);
        let (mut controller, ops) = controller(backend, "", false);

        controller.finish_dictation(recording());
        assert_eq!(ops.entries(), vec!["paste:hello world"]);
    }

    #[test]
    fn auto_submit_presses_enter_after_the_paste() {
        let backend = FakeBackend::new(Some("hello world"), None);
        let (mut controller, ops) = controller(backend, "", true);

        controller.finish_dictation(recording());
        assert_eq!(ops.entries(), vec!["paste:hello world", "enter"]);
    }

    #[test]
    fn failed_transcription_pastes_nothing() {
        let backend = FakeBackend::new(None, None);
        let (mut controller, ops) = controller(backend, "", true);

        controller.finish_dictation(recording());
        assert!(ops.entries().is_empty());
    }

    #[test]
    fn edit_turn_combines_highlight_and_instruction() {
        let backend = FakeBackend::new(Some("add a docstring"), Some("def f():\n    \"\"\"Doc.\"\"\"\n    pass"));
        let (mut controller, ops) = controller(backend.clone(), "", false);
        controller.highlight = Some("def f(): pass".to_string());

        controller.finish_edit(recording());

        // The LLM saw one user turn combining both inputs
        let seen = backend.seen.lock().unwrap();
        let user_turn = &seen[0].last().unwrap().content;
        assert!(user_turn.contains("def f(): pass"));
        assert!(user_turn.contains("add a docstring"));

        // The full rewritten body was pasted, and the captured flag reset
        assert_eq!(
            ops.entries(),
            vec!["paste:def f():\n    \"\"\"Doc.\"\"\"\n    pass"]
        );
        assert!(controller.highlight.is_none());
    }

    #[test]
    fn empty_transcript_short_circuits_before_the_llm() {
        let backend = FakeBackend::new(None, Some("never used"));
        let (mut controller, ops) = controller(backend.clone(), "", false);
        controller.highlight = Some("selection".to_string());

        controller.finish_edit(recording());

        assert!(backend.seen.lock().unwrap().is_empty());
        assert!(ops.entries().is_empty());
        // Captured flag still resets
        assert!(controller.highlight.is_none());
    }

    #[test]
    fn completion_failure_pastes_the_apology() {
        let backend = FakeBackend::new(Some("rewrite it"), None);
        let (mut controller, ops) = controller(backend, "", false);
        controller.highlight = Some("selection".to_string());

        controller.finish_edit(recording());

        let entries = ops.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("paste:Sorry"));
    }

    #[test]
    fn key_up_without_a_recording_returns_to_idle() {
        let backend = FakeBackend::new(Some("unused"), None);
        let (mut controller, ops) = controller(backend, "", false);

        controller.on_key_up(RecordingMode::Dictation);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(ops.entries().is_empty());
    }

    #[test]
    fn edit_key_up_without_a_recording_clears_the_captured_flag() {
        let backend = FakeBackend::new(Some("unused"), None);
        let (mut controller, _ops) = controller(backend, "", false);
        controller.highlight = Some("stale".to_string());

        controller.on_key_up(RecordingMode::Edit);
        assert!(controller.highlight.is_none());
        assert_eq!(controller.state(), ControllerState::Idle);
    }
}
