//! Capture lifecycle: one background thread per recording session.
//!
//! The hotkey handler must never block on the audio device, so `start` only
//! queries the default device and spawns a capture thread; the thread builds
//! the input stream, plays it, and parks on a stop channel. `stop` signals
//! the channel and joins the thread before touching the sample buffer, so
//! the buffer is never read while the callback is still appending to it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, StreamConfig};
use crossbeam_channel::{Receiver, Sender, bounded};

use super::buffer::AudioBuffer;

/// Which pipeline a finished recording feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    /// Transcript is pasted verbatim (optionally LLM-cleaned).
    Dictation,
    /// Transcript becomes an instruction for rewriting the highlighted text.
    Edit,
}

/// A recording that passed the minimum-duration gate.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedRecording {
    pub buffer: AudioBuffer,
    /// Wall time from key-down to key-up, used for WPM stats.
    pub elapsed_secs: f32,
}

/// Count of non-fatal stream errors for the current session. ALSA produces
/// these routinely; only the first is printed.
static STREAM_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

struct ActiveSession {
    mode: RecordingMode,
    samples: Arc<Mutex<Vec<f32>>>,
    sample_rate: u32,
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
    started_at: Instant,
}

/// Owns the capture lifecycle. At most one session is active at a time;
/// starting while one is active is a silent no-op.
pub struct Recorder {
    session: Option<ActiveSession>,
}

impl Recorder {
    pub fn new() -> Self {
        Self { session: None }
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_mode(&self) -> Option<RecordingMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// Start capturing from the default input device.
    ///
    /// Key-repeat delivers key-down events for the whole time the hotkey is
    /// held, so a start while a session is active is ignored rather than
    /// treated as an error.
    pub fn start(&mut self, mode: RecordingMode) -> Result<()> {
        if self.session.is_some() {
            crate::verbose!("start ignored: a recording session is already active");
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("no audio input device available"))?;
        let default_config = device
            .default_input_config()
            .context("failed to query input device configuration")?;
        let sample_format = default_config.sample_format();
        let config: StreamConfig = default_config.into();
        let sample_rate = config.sample_rate.0;

        STREAM_ERROR_COUNT.store(0, Ordering::Relaxed);
        let samples = Arc::new(Mutex::new(Vec::new()));
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let thread_samples = Arc::clone(&samples);
        let handle = std::thread::spawn(move || {
            if let Err(e) = run_capture(device, config, sample_format, thread_samples, stop_rx) {
                eprintln!("Audio capture failed: {e:#}");
            }
        });

        self.session = Some(ActiveSession {
            mode,
            samples,
            sample_rate,
            stop_tx,
            handle,
            started_at: Instant::now(),
        });
        println!("Recording started.");
        Ok(())
    }

    /// Stop the session that `mode` started.
    ///
    /// A key-up for a mode other than the active one is ignored (overlapping
    /// hotkey presses resolve to "first press wins"). Returns `None` when
    /// nothing was recording or the recording came in under the minimum
    /// duration, in which case the samples are dropped.
    pub fn stop(&mut self, mode: RecordingMode) -> Option<FinishedRecording> {
        if self.active_mode() != Some(mode) {
            return None;
        }
        let session = self.session.take()?;

        // Unblock the capture thread and wait for it to drop the stream
        // before reading the buffer.
        let _ = session.stop_tx.send(());
        if session.handle.join().is_err() {
            eprintln!("Audio capture thread panicked");
            return None;
        }

        let samples = std::mem::take(&mut *session.samples.lock().unwrap());
        let buffer = AudioBuffer::new(samples, session.sample_rate);
        let duration = buffer.duration_secs();
        if !buffer.meets_min_duration() {
            crate::verbose!("discarding {duration:.2}s recording (below minimum duration)");
            return None;
        }

        println!("Recording stopped. Duration: {duration:.2} seconds.");
        Some(FinishedRecording {
            buffer,
            elapsed_secs: session.started_at.elapsed().as_secs_f32(),
        })
    }

    /// Install a session without opening an audio device. Exercises the same
    /// session bookkeeping as `start`.
    #[cfg(test)]
    fn start_prefilled(&mut self, mode: RecordingMode, samples: Vec<f32>, sample_rate: u32) {
        if self.session.is_some() {
            return;
        }
        let samples = Arc::new(Mutex::new(samples));
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = std::thread::spawn(move || {
            let _ = stop_rx.recv();
        });
        self.session = Some(ActiveSession {
            mode,
            samples,
            sample_rate,
            stop_tx,
            handle,
            started_at: Instant::now(),
        });
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs on the capture thread. The stream lives and dies inside this
/// function, so the input device is released on every exit path.
fn run_capture(
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    samples: Arc<Mutex<Vec<f32>>>,
    stop_rx: Receiver<()>,
) -> Result<()> {
    let channels = config.channels;
    let stream = match sample_format {
        SampleFormat::F32 => build_input_stream::<f32>(&device, &config, channels, samples)?,
        SampleFormat::I16 => build_input_stream::<i16>(&device, &config, channels, samples)?,
        SampleFormat::U16 => build_input_stream::<u16>(&device, &config, channels, samples)?,
        other => anyhow::bail!("unsupported input sample format: {other:?}"),
    };
    stream.play().context("failed to start input stream")?;

    // Blocks until stop() sends or the Recorder is dropped (sender closed).
    let _ = stop_rx.recv();
    Ok(())
}

fn build_input_stream<T>(
    device: &Device,
    config: &StreamConfig,
    channels: u16,
    samples: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    // Transient device errors (common with ALSA and USB microphones) are
    // logged once and otherwise ignored; capture continues.
    let err_fn = |err| {
        let count = STREAM_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
        if count == 0 {
            eprintln!("Audio stream error (capture continues): {err}");
        }
    };

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mono: Vec<f32> = data
                .chunks(channels as usize)
                .map(|frame| {
                    frame
                        .iter()
                        .map(|&s| <f32 as cpal::Sample>::from_sample(s))
                        .sum::<f32>()
                        / channels as f32
                })
                .collect();
            samples.lock().unwrap().extend_from_slice(&mono);
        },
        err_fn,
        None,
    )?;
    Ok(stream)
}
