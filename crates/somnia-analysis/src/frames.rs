//! Shared per-clip analysis frames.
//!
//! The spectrogram, onset envelope, frame RMS, tempo estimate and beats are
//! computed once per clip and read by every analyzer.

use somnia_spec::{AnalysisConfig, AudioBuffer, DecodeError};

use crate::onset::{estimate_tempo, onset_strength, track_beats, TempoEstimate};
use crate::stft::{frame_rms, Spectrogram};

/// Intermediate representations of one clip.
#[derive(Debug, Clone)]
pub struct ClipFrames {
    /// Mono downmix.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub spectrogram: Spectrogram,
    pub onset: Vec<f64>,
    pub rms: Vec<f64>,
    pub tempo: Option<TempoEstimate>,
    /// Beat positions in frames.
    pub beats: Vec<usize>,
}

impl ClipFrames {
    /// Analyzes a decoded buffer.
    ///
    /// # Errors
    /// Returns [`DecodeError::Empty`] if the buffer holds no samples.
    pub fn compute(buffer: &AudioBuffer, config: &AnalysisConfig) -> Result<Self, DecodeError> {
        if buffer.is_empty() {
            return Err(DecodeError::Empty);
        }
        let samples = buffer.mono_f32();
        let sample_rate = buffer.sample_rate();
        let spectrogram = Spectrogram::compute(&samples, config.n_fft, config.hop_length, sample_rate);
        let onset = onset_strength(&spectrogram);
        let rms = frame_rms(&samples, config.n_fft, config.hop_length);
        let tempo = estimate_tempo(
            &onset,
            spectrogram.frame_rate(),
            config.min_bpm,
            config.max_bpm,
        );
        let beats = tempo
            .map(|t| track_beats(&onset, t.period))
            .unwrap_or_default();

        Ok(Self {
            samples,
            sample_rate,
            spectrogram,
            onset,
            rms,
            tempo,
            beats,
        })
    }

    /// Clip duration in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
