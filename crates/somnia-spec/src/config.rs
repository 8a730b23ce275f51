//! Engine configuration.
//!
//! All tunables live here so that thresholds tuned against one clip library
//! can be overridden without code changes. Every field has a default; a JSON
//! document only needs to name the fields it changes.

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Rate every decoded clip is conformed to, in Hz.
    pub sample_rate: u32,
    /// Channel count of rendered mixes.
    pub channels: usize,
    /// Gain for categories the active profile does not list, in dB.
    pub fallback_gain_db: f64,
    pub analysis: AnalysisConfig,
    pub classifier: ClassifierThresholds,
    pub selection: SelectionPolicy,
    pub master: MasterSettings,
    pub binaural: BinauralSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            fallback_gain_db: -3.0,
            analysis: AnalysisConfig::default(),
            classifier: ClassifierThresholds::default(),
            selection: SelectionPolicy::default(),
            master: MasterSettings::default(),
            binaural: BinauralSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), SpecError> {
        if !(8_000..=192_000).contains(&self.sample_rate) {
            return Err(SpecError::invalid_config(
                "sample_rate",
                format!("must be 8000-192000, got {}", self.sample_rate),
            ));
        }
        if !(1..=2).contains(&self.channels) {
            return Err(SpecError::invalid_config(
                "channels",
                format!("must be 1 or 2, got {}", self.channels),
            ));
        }
        if !self.fallback_gain_db.is_finite() {
            return Err(SpecError::invalid_config("fallback_gain_db", "must be finite"));
        }
        self.analysis.validate()?;
        self.selection.validate()?;
        self.master.validate()?;
        self.binaural.validate()?;
        Ok(())
    }
}

/// STFT, MFCC, tempo and peak-picking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// FFT size in samples.
    pub n_fft: usize,
    /// Hop between frames in samples.
    pub hop_length: usize,
    /// Energy fraction below the rolloff frequency.
    pub rolloff_percent: f64,
    pub n_mfcc: usize,
    pub n_mels: usize,
    pub min_bpm: f64,
    pub max_bpm: f64,
    /// Largest autocorrelation lag for repetitiveness, in frames.
    pub max_autocorr_lag: usize,
    pub peak_pick: PeakPickConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
            rolloff_percent: 0.85,
            n_mfcc: 13,
            n_mels: 26,
            min_bpm: 60.0,
            max_bpm: 180.0,
            max_autocorr_lag: 50,
            peak_pick: PeakPickConfig::default(),
        }
    }
}

impl AnalysisConfig {
    fn validate(&self) -> Result<(), SpecError> {
        if !self.n_fft.is_power_of_two() || self.n_fft < 64 {
            return Err(SpecError::invalid_config(
                "analysis.n_fft",
                format!("must be a power of two >= 64, got {}", self.n_fft),
            ));
        }
        if self.hop_length == 0 || self.hop_length > self.n_fft {
            return Err(SpecError::invalid_config(
                "analysis.hop_length",
                format!("must be 1..=n_fft, got {}", self.hop_length),
            ));
        }
        if !(0.0 < self.rolloff_percent && self.rolloff_percent < 1.0) {
            return Err(SpecError::invalid_config(
                "analysis.rolloff_percent",
                format!("must be in (0, 1), got {}", self.rolloff_percent),
            ));
        }
        if self.n_mfcc == 0 || self.n_mels < self.n_mfcc {
            return Err(SpecError::invalid_config(
                "analysis.n_mels",
                "need n_mfcc >= 1 and n_mels >= n_mfcc",
            ));
        }
        if !(self.min_bpm > 0.0 && self.max_bpm > self.min_bpm) {
            return Err(SpecError::invalid_config(
                "analysis.min_bpm",
                format!("need 0 < min_bpm < max_bpm, got {}..{}", self.min_bpm, self.max_bpm),
            ));
        }
        if self.max_autocorr_lag < 2 {
            return Err(SpecError::invalid_config(
                "analysis.max_autocorr_lag",
                "must be at least 2",
            ));
        }
        Ok(())
    }
}

/// Onset peak-picking window, in frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeakPickConfig {
    pub pre_max: usize,
    pub post_max: usize,
    pub pre_avg: usize,
    pub post_avg: usize,
    /// Amount a peak must exceed the local mean by.
    pub delta: f64,
    /// Minimum frames between peaks.
    pub wait: usize,
}

impl Default for PeakPickConfig {
    fn default() -> Self {
        Self {
            pre_max: 3,
            post_max: 3,
            pre_avg: 3,
            post_avg: 5,
            delta: 0.5,
            wait: 10,
        }
    }
}

/// Rule thresholds and point values for the classifier.
///
/// Defaults are reference values tuned against a particular clip library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierThresholds {
    pub rain_centroid_max: f64,
    pub rain_centroid_points: u32,
    /// Repetitiveness above this scores for rain and white noise.
    pub repetitive_min: f64,
    pub repetitive_points: u32,
    pub rain_cadence_min: f64,
    pub rain_cadence_points: u32,
    pub thunder_centroid_min: f64,
    pub thunder_centroid_max: f64,
    pub thunder_centroid_points: u32,
    pub thunder_loudness_min: f64,
    pub thunder_loudness_points: u32,
    pub white_noise_zcr_min: f64,
    pub white_noise_zcr_points: u32,
    pub white_noise_flatness_min: f64,
    pub white_noise_flatness_points: u32,
    pub nature_naturalness_min: f64,
    pub nature_naturalness_points: u32,
    pub nature_centroid_min: f64,
    pub nature_centroid_points: u32,
    pub water_centroid_max: f64,
    pub water_naturalness_min: f64,
    pub water_points: u32,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            rain_centroid_max: 2000.0,
            rain_centroid_points: 2,
            repetitive_min: 0.6,
            repetitive_points: 1,
            rain_cadence_min: 0.5,
            rain_cadence_points: 2,
            thunder_centroid_min: 500.0,
            thunder_centroid_max: 4000.0,
            thunder_centroid_points: 1,
            thunder_loudness_min: 0.1,
            thunder_loudness_points: 2,
            white_noise_zcr_min: 0.1,
            white_noise_zcr_points: 3,
            white_noise_flatness_min: 0.3,
            white_noise_flatness_points: 2,
            nature_naturalness_min: 0.6,
            nature_naturalness_points: 3,
            nature_centroid_min: 3000.0,
            nature_centroid_points: 1,
            water_centroid_max: 3000.0,
            water_naturalness_min: 0.5,
            water_points: 2,
        }
    }
}

/// Intelligent selection policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionPolicy {
    /// Maximum clips kept.
    pub top_n: usize,
    /// Clips scoring at or below this are excluded.
    pub min_score: f64,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            top_n: 8,
            min_score: 0.3,
        }
    }
}

impl SelectionPolicy {
    fn validate(&self) -> Result<(), SpecError> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(SpecError::invalid_config(
                "selection.min_score",
                format!("must be 0-1, got {}", self.min_score),
            ));
        }
        Ok(())
    }
}

/// Master bus processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MasterSettings {
    pub compressor_threshold_db: f64,
    pub compressor_ratio: f64,
    /// Final peak level in dBFS.
    pub normalize_headroom_db: f64,
    /// Q of the master biquads.
    pub filter_q: f64,
    /// Peak level each source clip is normalized to before layering, in dBFS.
    pub clip_headroom_db: f64,
}

impl Default for MasterSettings {
    fn default() -> Self {
        Self {
            compressor_threshold_db: -20.0,
            compressor_ratio: 2.0,
            normalize_headroom_db: -1.0,
            filter_q: std::f64::consts::FRAC_1_SQRT_2,
            clip_headroom_db: -1.0,
        }
    }
}

impl MasterSettings {
    fn validate(&self) -> Result<(), SpecError> {
        if !(-60.0..=0.0).contains(&self.compressor_threshold_db) {
            return Err(SpecError::invalid_config(
                "master.compressor_threshold_db",
                format!("must be -60 to 0, got {}", self.compressor_threshold_db),
            ));
        }
        if !(1.0..=20.0).contains(&self.compressor_ratio) {
            return Err(SpecError::invalid_config(
                "master.compressor_ratio",
                format!("must be 1.0-20.0, got {}", self.compressor_ratio),
            ));
        }
        if self.normalize_headroom_db > 0.0 || self.clip_headroom_db > 0.0 {
            return Err(SpecError::invalid_config(
                "master.normalize_headroom_db",
                "headroom must be at or below 0 dBFS",
            ));
        }
        if self.filter_q.is_nan() || self.filter_q <= 0.0 {
            return Err(SpecError::invalid_config("master.filter_q", "must be positive"));
        }
        Ok(())
    }
}

/// Binaural layer level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinauralSettings {
    /// Output gain in dBFS.
    pub gain_db: f64,
}

impl Default for BinauralSettings {
    fn default() -> Self {
        Self { gain_db: -12.0 }
    }
}

impl BinauralSettings {
    fn validate(&self) -> Result<(), SpecError> {
        if !self.gain_db.is_finite() || self.gain_db > 0.0 {
            return Err(SpecError::invalid_config(
                "binaural.gain_db",
                format!("must be at or below 0 dBFS, got {}", self.gain_db),
            ));
        }
        Ok(())
    }
}
