//! Binaural beat synthesis.
//!
//! The left ear gets a pure sine at the base frequency and the right ear a
//! sine at base plus beat frequency. The beat is never mixed into a single
//! channel unless the caller forces mono output.

use std::f64::consts::PI;

use somnia_spec::AudioBuffer;
use tracing::{debug, warn};

use crate::effects::db_to_amp;
use crate::error::{MixError, MixResult};
use crate::mixer::MasterBuffer;

/// Default output gain in dBFS.
pub const DEFAULT_BINAURAL_GAIN_DB: f64 = -12.0;

/// Parameters of one binaural layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinauralParams {
    /// Length in milliseconds.
    pub duration_ms: u64,
    /// Left-ear frequency in Hz.
    pub base_freq: f64,
    /// Right-ear offset in Hz.
    pub beat_freq: f64,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
}

impl BinauralParams {
    /// Checks every parameter and returns the first violation.
    pub fn validate(&self) -> MixResult<()> {
        if self.duration_ms == 0 {
            return Err(MixError::synthesis_param("duration_ms", "must be positive"));
        }
        if self.sample_rate == 0 {
            return Err(MixError::synthesis_param("sample_rate", "must be positive"));
        }
        if !self.base_freq.is_finite() || self.base_freq <= 0.0 {
            return Err(MixError::synthesis_param(
                "base_freq",
                format!("must be positive, got {}", self.base_freq),
            ));
        }
        if !self.beat_freq.is_finite() || self.beat_freq <= 0.0 {
            return Err(MixError::synthesis_param(
                "beat_freq",
                format!("must be positive, got {}", self.beat_freq),
            ));
        }
        let nyquist = self.sample_rate as f64 / 2.0;
        if self.base_freq + self.beat_freq >= nyquist {
            return Err(MixError::synthesis_param(
                "beat_freq",
                format!(
                    "right-ear tone {} Hz is at or above Nyquist {} Hz",
                    self.base_freq + self.beat_freq,
                    nyquist
                ),
            ));
        }
        Ok(())
    }
}

/// Generates binaural beat layers.
#[derive(Debug, Clone)]
pub struct BinauralBeatSynthesizer {
    gain_db: f64,
    force_mono: bool,
}

impl Default for BinauralBeatSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_BINAURAL_GAIN_DB)
    }
}

impl BinauralBeatSynthesizer {
    /// Creates a synthesizer with the given output gain in dBFS.
    pub fn new(gain_db: f64) -> Self {
        Self {
            gain_db,
            force_mono: false,
        }
    }

    /// Averages both tones into one channel.
    pub fn with_forced_mono(mut self, force_mono: bool) -> Self {
        self.force_mono = force_mono;
        self
    }

    /// Generates the layer.
    ///
    /// # Errors
    /// Returns [`MixError::SynthesisParameter`] for non-positive duration,
    /// sample rate or frequencies.
    pub fn try_generate(&self, params: &BinauralParams) -> MixResult<AudioBuffer> {
        params.validate()?;

        let frames = AudioBuffer::frames_for_ms(params.duration_ms, params.sample_rate);
        let sr = params.sample_rate as f64;
        let gain = db_to_amp(self.gain_db);
        let right_freq = params.base_freq + params.beat_freq;

        let tone = |freq: f64| -> Vec<f64> {
            (0..frames)
                .map(|i| gain * (2.0 * PI * freq * i as f64 / sr).sin())
                .collect()
        };
        let left = tone(params.base_freq);
        let right = tone(right_freq);

        debug!(
            base_freq = params.base_freq,
            beat_freq = params.beat_freq,
            duration_ms = params.duration_ms,
            "generated binaural beat"
        );

        if self.force_mono {
            let mono = left.iter().zip(&right).map(|(l, r)| (l + r) * 0.5).collect();
            return Ok(AudioBuffer::mono(mono, params.sample_rate));
        }
        Ok(AudioBuffer::stereo(left, right, params.sample_rate))
    }

    /// Generates the layer, or `None` when the parameters are invalid.
    pub fn generate(&self, params: &BinauralParams) -> Option<AudioBuffer> {
        match self.try_generate(params) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                warn!("Skipping binaural layer: {}", e);
                None
            }
        }
    }
}

/// Adds a binaural layer onto the master.
///
/// A mono master is upmixed to stereo first so each ear keeps its own tone.
/// A mono layer is duplicated across a stereo master.
pub fn overlay_binaural(master: &mut MasterBuffer, layer: &AudioBuffer) {
    if layer.num_channels() >= 2 {
        master.upmix_to_stereo();
    }
    master.overlay(layer, 1.0);
}
