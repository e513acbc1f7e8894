pub mod audio;
pub mod clipboard;
pub mod config;
pub mod http;
pub mod provider;
pub mod response;
pub mod transcription;
pub mod verbose;

pub use audio::{AudioBuffer, FinishedRecording, MIN_RECORDING_SECS, Recorder, RecordingMode};
pub use clipboard::{CLIPBOARD_SETTLE, ClipboardBridge, TextInjector};
pub use config::{ConfigError, Settings};
pub use provider::{
    ChatMessage, CloudBackend, GroqBackend, OpenAiBackend, Role, TranscriptionRequest,
    select_backend,
};
pub use response::{COMPLETION_FALLBACK_MESSAGE, DEFAULT_HISTORY_LIMIT, ResponseService};
pub use transcription::{TranscriptStats, TranscriptionService};
pub use verbose::set_verbose;
