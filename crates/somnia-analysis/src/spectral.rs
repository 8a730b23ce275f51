//! Spectral descriptors: centroid, bandwidth, rolloff, flatness, zero-crossing
//! rate, loudness and tempo.
//!
//! Per-frame statistics are averaged over frames that carry energy; a clip of
//! pure silence reports zeros.

use somnia_spec::{AnalysisConfig, AudioBuffer, DecodeError, SpectralFeatures};

use crate::frames::ClipFrames;
use crate::stft::{mean_std, zero_crossing_rate, Spectrogram};

/// Extracts [`SpectralFeatures`] from a clip.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: AnalysisConfig,
}

impl FeatureExtractor {
    /// Creates an extractor.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Extracts features from a decoded buffer.
    ///
    /// # Errors
    /// Returns [`DecodeError::Empty`] for an empty buffer.
    pub fn extract(&self, buffer: &AudioBuffer) -> Result<SpectralFeatures, DecodeError> {
        let frames = ClipFrames::compute(buffer, &self.config)?;
        Ok(self.extract_frames(&frames))
    }

    /// Extracts features from precomputed frames.
    pub fn extract_frames(&self, frames: &ClipFrames) -> SpectralFeatures {
        let spec = &frames.spectrogram;
        let mut centroids = Vec::with_capacity(spec.num_frames());
        let mut bandwidths = Vec::with_capacity(spec.num_frames());
        let mut rolloffs = Vec::with_capacity(spec.num_frames());

        for frame in &spec.frames {
            let total: f64 = frame.iter().sum();
            if total <= 0.0 {
                continue;
            }
            let centroid = frame
                .iter()
                .enumerate()
                .map(|(k, m)| spec.bin_frequency(k) * m)
                .sum::<f64>()
                / total;
            let spread = frame
                .iter()
                .enumerate()
                .map(|(k, m)| (spec.bin_frequency(k) - centroid).powi(2) * m)
                .sum::<f64>()
                / total;

            let threshold = total * self.config.rolloff_percent;
            let mut cumulative = 0.0;
            let mut rolloff_bin = frame.len() - 1;
            for (k, m) in frame.iter().enumerate() {
                cumulative += m;
                if cumulative >= threshold {
                    rolloff_bin = k;
                    break;
                }
            }

            centroids.push(centroid);
            bandwidths.push(spread.sqrt());
            rolloffs.push(spec.bin_frequency(rolloff_bin));
        }

        SpectralFeatures {
            spectral_centroid: mean_std(&centroids).0,
            spectral_bandwidth: mean_std(&bandwidths).0,
            spectral_rolloff: mean_std(&rolloffs).0,
            spectral_flatness: mean_flatness(spec),
            zero_crossing_rate: zero_crossing_rate(&frames.samples),
            loudness: mean_std(&frames.rms).0,
            tempo: frames.tempo.map_or(0.0, |t| t.bpm),
            duration: frames.duration(),
        }
    }
}

/// Mean Wiener entropy of the power spectrum over non-silent frames.
pub fn mean_flatness(spec: &Spectrogram) -> f64 {
    const AMIN: f64 = 1e-10;
    let values: Vec<f64> = spec
        .frames
        .iter()
        .filter(|f| f.iter().any(|&m| m > 0.0))
        .map(|frame| {
            let n = frame.len() as f64;
            let power = frame.iter().map(|m| (m * m).max(AMIN));
            let (log_sum, sum) = power.fold((0.0, 0.0), |(l, s), p| (l + p.ln(), s + p));
            let geometric = (log_sum / n).exp();
            let arithmetic = sum / n;
            (geometric / arithmetic).min(1.0)
        })
        .collect();
    mean_std(&values).0
}
