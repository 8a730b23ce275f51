//! Rhythm and periodicity descriptors.

use somnia_spec::{AnalysisConfig, AudioBuffer, DecodeError, TemporalFeatures};

use crate::frames::ClipFrames;
use crate::mfcc::mfcc;
use crate::onset::{intervals, peak_pick};
use crate::stft::{coefficient_of_variation, mean_std};

/// Computes [`TemporalFeatures`].
#[derive(Debug, Clone, Default)]
pub struct TemporalPatternAnalyzer {
    config: AnalysisConfig,
}

impl TemporalPatternAnalyzer {
    /// Creates an analyzer.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyzes a decoded buffer.
    ///
    /// # Errors
    /// Returns [`DecodeError::Empty`] for an empty buffer.
    pub fn analyze(&self, buffer: &AudioBuffer) -> Result<TemporalFeatures, DecodeError> {
        let frames = ClipFrames::compute(buffer, &self.config)?;
        Ok(self.analyze_frames(&frames))
    }

    /// Analyzes precomputed frames.
    pub fn analyze_frames(&self, frames: &ClipFrames) -> TemporalFeatures {
        let tempo_consistency = tempo_consistency(&frames.beats);

        let timbre = self.timbre_profile(frames);
        let repetitiveness_score = repetitiveness(&timbre, self.config.max_autocorr_lag);

        let peaks = peak_pick(&frames.onset, &self.config.peak_pick);
        let cadence_regularity = cadence_regularity(&peaks);
        let evenness = evenness(&frames.rms);

        TemporalFeatures {
            tempo: frames.tempo.map_or(0.0, |t| t.bpm),
            tempo_consistency,
            repetitiveness_score,
            cadence_regularity,
            evenness,
            naturalness_score: naturalness(repetitiveness_score, cadence_regularity, tempo_consistency),
        }
    }

    /// Time-averaged MFCCs, one value per coefficient.
    pub fn timbre_profile(&self, frames: &ClipFrames) -> Vec<f64> {
        let coeffs = mfcc(&frames.spectrogram, self.config.n_mels, self.config.n_mfcc);
        coefficient_means(&coeffs, self.config.n_mfcc)
    }
}

/// Mean of each of the first `num_coeffs` coefficients across frames.
pub fn coefficient_means(frames: &[Vec<f64>], num_coeffs: usize) -> Vec<f64> {
    if frames.is_empty() {
        return Vec::new();
    }
    let mut sums = vec![0.0; num_coeffs];
    for frame in frames {
        for (sum, c) in sums.iter_mut().zip(frame) {
            *sum += c;
        }
    }
    let n = frames.len() as f64;
    sums.into_iter().map(|s| s / n).collect()
}

/// `1 − std/mean` of beat intervals with at least three beats, else 0.
pub fn tempo_consistency(beats: &[usize]) -> f64 {
    if beats.len() < 3 {
        return 0.0;
    }
    let (mean, std) = mean_std(&intervals(beats));
    if mean > 0.0 {
        1.0 - std / mean
    } else {
        0.0
    }
}

/// Mean normalized autocorrelation of `series` over lags `1..max_lag`.
///
/// The lag range is clamped to the series length; fewer than two values
/// report 0.
pub fn repetitiveness(series: &[f64], max_lag: usize) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }
    let ac = |lag: usize| -> f64 {
        series[lag..]
            .iter()
            .zip(&series[..n - lag])
            .map(|(a, b)| a * b)
            .sum()
    };
    let ac0 = ac(0);
    let norm = if ac0 > 0.0 { ac0 } else { 1.0 };
    let upper = max_lag.min(n);
    let lags: Vec<f64> = (1..upper).map(|lag| ac(lag) / norm).collect();
    mean_std(&lags).0
}

/// Regularity of onset peak spacing.
///
/// More than two peaks: `1 − min(1, std/mean)` of the intervals. One or two
/// peaks: 0.5. No peaks: 0.
pub fn cadence_regularity(peaks: &[usize]) -> f64 {
    match peaks.len() {
        0 => 0.0,
        1 | 2 => 0.5,
        _ => 1.0 - coefficient_of_variation(&intervals(peaks)).min(1.0),
    }
}

/// `1 − min(1, std/mean)` of frame RMS; 0 without frames or energy.
pub fn evenness(rms: &[f64]) -> f64 {
    let (mean, std) = mean_std(rms);
    if mean > 0.0 {
        1.0 - (std / mean).min(1.0)
    } else {
        0.0
    }
}

/// `0.4·repetitiveness + 0.3·(1 − cadence) + 0.3·tempo_consistency`.
pub fn naturalness(repetitiveness: f64, cadence_regularity: f64, tempo_consistency: f64) -> f64 {
    0.4 * repetitiveness + 0.3 * (1.0 - cadence_regularity) + 0.3 * tempo_consistency
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tempo_consistency() {
        assert_eq!(tempo_consistency(&[0, 10]), 0.0);
        assert_eq!(tempo_consistency(&[0, 10, 20, 30]), 1.0);
        let irregular = tempo_consistency(&[0, 10, 30, 40]);
        assert!(irregular < 1.0 && irregular > 0.0);
    }

    #[test]
    fn test_cadence_cases() {
        assert_eq!(cadence_regularity(&[]), 0.0);
        assert_eq!(cadence_regularity(&[5]), 0.5);
        assert_eq!(cadence_regularity(&[5, 20]), 0.5);
        assert_eq!(cadence_regularity(&[0, 20, 40, 60]), 1.0);
        assert!((cadence_regularity(&[0, 1, 100]) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_evenness() {
        assert_eq!(evenness(&[]), 0.0);
        assert_eq!(evenness(&[0.0, 0.0]), 0.0);
        assert_eq!(evenness(&[0.5, 0.5, 0.5]), 1.0);
        assert_eq!(evenness(&[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_repetitiveness_of_constant_series() {
        assert_eq!(repetitiveness(&[], 50), 0.0);
        assert_eq!(repetitiveness(&[3.0], 50), 0.0);
        // Lag k overlaps n - k of n values.
        let r = repetitiveness(&[1.0; 4], 50);
        assert!((r - (0.75 + 0.5 + 0.25) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_repetitiveness_lag_clamped() {
        let series = vec![1.0; 200];
        let r = repetitiveness(&series, 50);
        let expected = (1..50).map(|k| (200 - k) as f64 / 200.0).sum::<f64>() / 49.0;
        assert!((r - expected).abs() < 1e-12);
    }

    #[test]
    fn test_coefficient_means_average_over_time() {
        let frames = vec![vec![1.0, 2.0, 3.0], vec![3.0, 4.0, 5.0]];
        assert_eq!(coefficient_means(&frames, 3), vec![2.0, 3.0, 4.0]);
        assert_eq!(coefficient_means(&[], 3), Vec::<f64>::new());
    }

    #[test]
    fn test_repetitiveness_separates_timbre_profiles() {
        // A smooth profile correlates with its shifts; an alternating one does not.
        let smooth: Vec<f64> = (0..13).map(|k| 13.0 - k as f64).collect();
        let alternating: Vec<f64> = (0..13).map(|k| if k % 2 == 0 { 5.0 } else { -5.0 }).collect();
        let r_smooth = repetitiveness(&smooth, 50);
        let r_alternating = repetitiveness(&alternating, 50);
        assert!(r_smooth > 0.3, "smooth profile scored {r_smooth}");
        assert!(r_alternating < 0.0, "alternating profile scored {r_alternating}");
    }

    #[test]
    fn test_timbre_profile_has_one_value_per_coefficient() {
        let config = AnalysisConfig::default();
        let sr = 22_050;
        let samples: Vec<f64> = (0..sr * 5)
            .map(|i| 0.5 * (2.0 * std::f64::consts::PI * 440.0 * i as f64 / sr as f64).sin())
            .collect();
        let buffer = AudioBuffer::mono(samples, sr as u32);
        let frames = ClipFrames::compute(&buffer, &config).unwrap();
        let analyzer = TemporalPatternAnalyzer::new(config.clone());

        let profile = analyzer.timbre_profile(&frames);
        assert_eq!(profile.len(), config.n_mfcc);

        let features = analyzer.analyze_frames(&frames);
        assert!(
            features.repetitiveness_score < 0.6,
            "steady tone scored {}",
            features.repetitiveness_score
        );
    }

    #[test]
    fn test_naturalness_weights() {
        assert!((naturalness(1.0, 0.0, 1.0) - 1.0).abs() < 1e-12);
        assert!((naturalness(0.0, 1.0, 0.0)).abs() < 1e-12);
        assert!((naturalness(0.5, 0.5, 0.5) - 0.5).abs() < 1e-12);
    }
}
