//! Perceptual band energies, roughness, tonalness and the relaxation score.

use somnia_spec::{AnalysisConfig, AudioBuffer, BandEnergies, DecodeError, PsychoacousticFeatures};

use crate::frames::ClipFrames;
use crate::spectral::mean_flatness;
use crate::stft::{coefficient_of_variation, mean_std, Spectrogram};

/// Fraction of bins averaged for the peak and valley of a band.
const CONTRAST_QUANTILE: f64 = 0.02;

/// Computes [`PsychoacousticFeatures`].
#[derive(Debug, Clone, Default)]
pub struct PsychoacousticAnalyzer {
    config: AnalysisConfig,
}

impl PsychoacousticAnalyzer {
    /// Creates an analyzer.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyzes a decoded buffer.
    ///
    /// # Errors
    /// Returns [`DecodeError::Empty`] for an empty buffer.
    pub fn analyze(&self, buffer: &AudioBuffer) -> Result<PsychoacousticFeatures, DecodeError> {
        let frames = ClipFrames::compute(buffer, &self.config)?;
        Ok(self.analyze_frames(&frames))
    }

    /// Analyzes precomputed frames.
    pub fn analyze_frames(&self, frames: &ClipFrames) -> PsychoacousticFeatures {
        let spec = &frames.spectrogram;
        let bands = BandEnergies::from_array(
            BandEnergies::RANGES.map(|(lo, hi)| band_contrast(spec, lo, hi)),
        );
        let roughness = coefficient_of_variation(&frames.onset);
        let flatness = mean_flatness(spec);

        PsychoacousticFeatures {
            bands,
            roughness,
            spectral_flatness: flatness,
            tonalness: 1.0 - flatness,
            relaxation_score: relaxation_score(&bands, roughness),
            tempo_stability: frames.tempo.map_or(0.0, |t| t.confidence),
        }
    }
}

/// `0.3·low + 0.2·mid − 0.2·high − 0.3·very_high − 5·roughness`, unbounded.
pub fn relaxation_score(bands: &BandEnergies, roughness: f64) -> f64 {
    0.3 * bands.low + 0.2 * bands.mid - 0.2 * bands.high - 0.3 * bands.very_high - 5.0 * roughness
}

/// Mean spectral contrast of a band, in dB.
///
/// Per frame, contrast is `10·log10(peak / valley)` where peak and valley are
/// the mean power of the top and bottom quantile of bins in the band. Bands
/// above Nyquist report 0.
fn band_contrast(spec: &Spectrogram, low_hz: f64, high_hz: f64) -> f64 {
    const AMIN: f64 = 1e-10;
    let range = spec.bin_range(low_hz, high_hz);
    if range.is_empty() {
        return 0.0;
    }
    let take = ((range.len() as f64 * CONTRAST_QUANTILE).round() as usize).max(1);

    let contrasts: Vec<f64> = spec
        .frames
        .iter()
        .map(|frame| {
            let mut power: Vec<f64> = frame[range.clone()].iter().map(|m| m * m).collect();
            power.sort_by(f64::total_cmp);
            let valley = power[..take].iter().sum::<f64>() / take as f64;
            let peak = power[power.len() - take..].iter().sum::<f64>() / take as f64;
            10.0 * peak.max(AMIN).log10() - 10.0 * valley.max(AMIN).log10()
        })
        .collect();
    mean_std(&contrasts).0
}
