//! In-memory sample storage for one recording session.

use std::path::Path;

use anyhow::{Context, Result};

/// Recordings shorter than this are discarded without any downstream work:
/// no transcription request, no paste, no error.
pub const MIN_RECORDING_SECS: f32 = 0.2;

/// A mono recording, appended to by the capture thread while the hotkey is
/// held and consumed exactly once after stop.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Whether the recording is long enough to be worth transcribing.
    pub fn meets_min_duration(&self) -> bool {
        self.duration_secs() >= MIN_RECORDING_SECS
    }

    /// Write the buffer as a mono 16-bit PCM WAV file at the capture rate.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer =
            hound::WavWriter::create(path, spec).context("failed to create WAV file")?;
        for &sample in &self.samples {
            let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(quantized)
                .context("failed to write WAV sample")?;
        }
        writer.finalize().context("failed to finalize WAV file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_samples_over_rate() {
        let buffer = AudioBuffer::new(vec![0.0; 22_050], 44_100);
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sub_threshold_buffer_fails_gate() {
        // 0.1s at 44.1kHz, below the 0.2s minimum
        let buffer = AudioBuffer::new(vec![0.0; 4_410], 44_100);
        assert!(!buffer.meets_min_duration());
    }

    #[test]
    fn threshold_buffer_passes_gate() {
        let buffer = AudioBuffer::new(vec![0.0; 8_820], 44_100);
        assert!(buffer.meets_min_duration());
    }

    #[test]
    fn wav_export_is_mono_16bit_at_capture_rate() {
        let buffer = AudioBuffer::new(vec![0.0, 0.5, -0.5, 1.0, -1.0, 2.0], 44_100);
        let file = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .unwrap();
        buffer.write_wav(file.path()).unwrap();

        let reader = hound::WavReader::open(file.path()).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), buffer.len());
        assert_eq!(samples[0], 0);
        assert_eq!(samples[3], i16::MAX);
        // Out-of-range input is clamped, not wrapped
        assert_eq!(samples[5], i16::MAX);
    }
}
