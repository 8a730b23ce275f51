//! Per-clip acoustic descriptors.
//!
//! Each analyzer fills one partial struct; [`FeatureVector::combine`] joins
//! them into the fixed-field vector the classifier and scorers consume.

use serde::{Deserialize, Serialize};

/// Perceptual band energies, in dB of spectral contrast.
///
/// Bands: infrasonic 20–60 Hz, low 60–250, low-mid 250–500, mid 500–2000,
/// high-mid 2000–4000, high 4000–6000, very-high 6000–20000.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandEnergies {
    /// 20–60 Hz.
    pub infrasonic: f64,
    /// 60–250 Hz.
    pub low: f64,
    /// 250–500 Hz.
    pub low_mid: f64,
    /// 500–2000 Hz.
    pub mid: f64,
    /// 2000–4000 Hz.
    pub high_mid: f64,
    /// 4000–6000 Hz.
    pub high: f64,
    /// 6000–20000 Hz.
    pub very_high: f64,
}

impl BandEnergies {
    /// Band edges in Hz, in field order.
    pub const RANGES: [(f64, f64); 7] = [
        (20.0, 60.0),
        (60.0, 250.0),
        (250.0, 500.0),
        (500.0, 2000.0),
        (2000.0, 4000.0),
        (4000.0, 6000.0),
        (6000.0, 20000.0),
    ];

    /// Builds band energies from values in [`Self::RANGES`] order.
    pub fn from_array(values: [f64; 7]) -> Self {
        Self {
            infrasonic: values[0],
            low: values[1],
            low_mid: values[2],
            mid: values[3],
            high_mid: values[4],
            high: values[5],
            very_high: values[6],
        }
    }

    /// Returns the values in [`Self::RANGES`] order.
    pub fn to_array(&self) -> [f64; 7] {
        [
            self.infrasonic,
            self.low,
            self.low_mid,
            self.mid,
            self.high_mid,
            self.high,
            self.very_high,
        ]
    }
}

/// Output of the feature extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectralFeatures {
    pub spectral_centroid: f64,
    pub spectral_bandwidth: f64,
    pub spectral_rolloff: f64,
    pub spectral_flatness: f64,
    pub zero_crossing_rate: f64,
    /// Mean frame RMS.
    pub loudness: f64,
    /// Estimated tempo in BPM, 0 when no pulse was found.
    pub tempo: f64,
    /// Clip duration in seconds.
    pub duration: f64,
}

/// Output of the psychoacoustic analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PsychoacousticFeatures {
    pub bands: BandEnergies,
    /// Coefficient of variation of the onset envelope.
    pub roughness: f64,
    pub spectral_flatness: f64,
    /// `1 - spectral_flatness`.
    pub tonalness: f64,
    /// Unbounded linear relaxation score.
    pub relaxation_score: f64,
    /// Beat tracker confidence.
    pub tempo_stability: f64,
}

/// Output of the temporal pattern analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalFeatures {
    pub tempo: f64,
    pub tempo_consistency: f64,
    pub repetitiveness_score: f64,
    pub cadence_regularity: f64,
    pub evenness: f64,
    pub naturalness_score: f64,
}

/// The complete descriptor set for one clip.
///
/// `Default` is the all-zero vector substituted for clips that fail to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub spectral_centroid: f64,
    pub spectral_bandwidth: f64,
    pub spectral_rolloff: f64,
    pub spectral_flatness: f64,
    pub zero_crossing_rate: f64,
    pub loudness: f64,
    pub tempo: f64,
    pub duration: f64,
    #[serde(flatten)]
    pub bands: BandEnergies,
    pub roughness: f64,
    pub tonalness: f64,
    pub relaxation_score: f64,
    pub tempo_stability: f64,
    pub tempo_consistency: f64,
    pub repetitiveness_score: f64,
    pub cadence_regularity: f64,
    pub evenness: f64,
    pub naturalness_score: f64,
}

impl FeatureVector {
    /// Joins the three analyzer outputs.
    ///
    /// Tempo and flatness come from the spectral pass.
    pub fn combine(
        spectral: SpectralFeatures,
        psycho: PsychoacousticFeatures,
        temporal: TemporalFeatures,
    ) -> Self {
        Self {
            spectral_centroid: spectral.spectral_centroid,
            spectral_bandwidth: spectral.spectral_bandwidth,
            spectral_rolloff: spectral.spectral_rolloff,
            spectral_flatness: spectral.spectral_flatness,
            zero_crossing_rate: spectral.zero_crossing_rate,
            loudness: spectral.loudness,
            tempo: spectral.tempo,
            duration: spectral.duration,
            bands: psycho.bands,
            roughness: psycho.roughness,
            tonalness: psycho.tonalness,
            relaxation_score: psycho.relaxation_score,
            tempo_stability: psycho.tempo_stability,
            tempo_consistency: temporal.tempo_consistency,
            repetitiveness_score: temporal.repetitiveness_score,
            cadence_regularity: temporal.cadence_regularity,
            evenness: temporal.evenness,
            naturalness_score: temporal.naturalness_score,
        }
    }

    /// Returns true if every field is exactly zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
