//! Audio capture and buffering.

mod buffer;
mod recorder;

pub use buffer::{AudioBuffer, MIN_RECORDING_SECS};
pub use recorder::{FinishedRecording, Recorder, RecordingMode};
