//! Sleep, focus and relaxation metrics derived from a feature vector.
//!
//! Composite scores are clamped to [0, 1] here, at the boundary where raw
//! descriptors become purpose scores. [`FeatureVector::relaxation_score`]
//! itself stays unbounded.

use somnia_spec::{FeatureVector, TherapeuticMetrics};

use crate::frames::ClipFrames;
use crate::stft::mean_std;

fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Relaxation score scaled into [0, 1].
pub fn relaxation_factor(relaxation_score: f64) -> f64 {
    clamp01(relaxation_score / 10.0)
}

/// Blend of spectral darkness, steadiness and naturalness.
pub fn sleep_induction_potential(fv: &FeatureVector) -> f64 {
    let frequency = (1.0 - (fv.spectral_centroid / 4000.0).min(1.0)) * 0.5
        + (fv.bands.low - fv.bands.very_high).max(0.0) * 0.5;
    let consistency = fv.evenness * 0.4
        + (1.0 - (0.7 - fv.repetitiveness_score).abs() / 0.7) * 0.3
        + (1.0 - fv.zero_crossing_rate * 20.0) * 0.3;
    let natural = fv.naturalness_score * 0.5 + relaxation_factor(fv.relaxation_score) * 0.5;
    clamp01(0.4 * frequency + 0.4 * consistency + 0.2 * natural)
}

/// Fraction of focus-friendly ranges the clip falls into.
pub fn focus_enhancement(fv: &FeatureVector) -> f64 {
    let centroid = if (1500.0..=3000.0).contains(&fv.spectral_centroid) {
        1.0
    } else if (1000.0..=3500.0).contains(&fv.spectral_centroid) {
        0.5
    } else {
        0.0
    };
    let flatness = if (0.2..=0.6).contains(&fv.spectral_flatness) {
        1.0
    } else {
        0.0
    };
    let tempo = if (70.0..=120.0).contains(&fv.tempo) {
        1.0
    } else {
        0.0
    };
    (centroid + flatness + tempo) / 3.0
}

/// Noise-like, steady clips make good ambient beds.
pub fn ambient_score(fv: &FeatureVector) -> f64 {
    clamp01(0.5 * fv.spectral_flatness + 0.5 * fv.evenness)
}

/// Broadband, flat clips mask external noise.
pub fn masking_potential(fv: &FeatureVector) -> f64 {
    clamp01(0.6 * fv.spectral_flatness + 0.4 * (fv.spectral_bandwidth / 4000.0).min(1.0))
}

/// How closely the level of the first half second matches the last.
///
/// Silence loops perfectly.
pub fn loop_seamlessness(samples: &[f32], sample_rate: u32) -> f64 {
    let edge = (sample_rate as usize / 2).min(samples.len() / 2);
    if edge == 0 {
        return 1.0;
    }
    let rms = |s: &[f32]| -> f64 {
        (s.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / s.len() as f64).sqrt()
    };
    let head = rms(&samples[..edge]);
    let tail = rms(&samples[samples.len() - edge..]);
    let larger = head.max(tail);
    if larger <= 0.0 {
        return 1.0;
    }
    clamp01(1.0 - (head - tail).abs() / larger)
}

/// Ratio of loudest to mean frame RMS, in dB. 0 for silence.
pub fn dynamic_range_db(rms: &[f64]) -> f64 {
    let (mean, _) = mean_std(rms);
    let peak = rms.iter().copied().fold(0.0_f64, f64::max);
    if mean > 0.0 && peak > 0.0 {
        20.0 * (peak / mean).log10()
    } else {
        0.0
    }
}

/// Rough integrated loudness estimate from whole-clip RMS.
pub fn lufs_estimate(samples: &[f32]) -> f64 {
    let rms = if samples.is_empty() {
        0.0
    } else {
        (samples.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / samples.len() as f64)
            .sqrt()
    };
    20.0 * (rms + 1e-8).log10() - 3.0
}

/// All metrics for one clip.
pub fn therapeutic_metrics(fv: &FeatureVector, frames: &ClipFrames) -> TherapeuticMetrics {
    TherapeuticMetrics {
        sleep_induction_potential: sleep_induction_potential(fv),
        focus_enhancement_score: focus_enhancement(fv),
        relaxation_factor: relaxation_factor(fv.relaxation_score),
        ambient_score: ambient_score(fv),
        masking_potential: masking_potential(fv),
        loop_seamlessness: loop_seamlessness(&frames.samples, frames.sample_rate),
        dynamic_range_db: dynamic_range_db(&frames.rms),
        lufs_estimate: lufs_estimate(&frames.samples),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use somnia_spec::BandEnergies;

    #[test]
    fn test_relaxation_factor_clamps() {
        assert_eq!(relaxation_factor(-12.0), 0.0);
        assert_eq!(relaxation_factor(5.0), 0.5);
        assert_eq!(relaxation_factor(40.0), 1.0);
        assert_eq!(relaxation_factor(f64::NAN), 0.0);
    }

    #[test]
    fn test_sleep_potential_prefers_dark_steady_audio() {
        let dark = FeatureVector {
            spectral_centroid: 400.0,
            bands: BandEnergies {
                low: 1.0,
                ..Default::default()
            },
            evenness: 0.9,
            repetitiveness_score: 0.7,
            zero_crossing_rate: 0.01,
            naturalness_score: 0.6,
            relaxation_score: 6.0,
            ..Default::default()
        };
        let bright = FeatureVector {
            spectral_centroid: 6000.0,
            evenness: 0.2,
            repetitiveness_score: 0.1,
            zero_crossing_rate: 0.4,
            ..Default::default()
        };
        let d = sleep_induction_potential(&dark);
        let b = sleep_induction_potential(&bright);
        assert!(d > b);
        assert!((0.0..=1.0).contains(&d));
        assert!((0.0..=1.0).contains(&b));
    }

    #[test]
    fn test_focus_checks() {
        let ideal = FeatureVector {
            spectral_centroid: 2000.0,
            spectral_flatness: 0.4,
            tempo: 90.0,
            ..Default::default()
        };
        assert_eq!(focus_enhancement(&ideal), 1.0);
        let near = FeatureVector {
            spectral_centroid: 1200.0,
            ..Default::default()
        };
        assert_eq!(focus_enhancement(&near), 0.5 / 3.0);
    }

    #[test]
    fn test_loop_seamlessness() {
        assert_eq!(loop_seamlessness(&[0.0; 1000], 100), 1.0);
        assert_eq!(loop_seamlessness(&[0.5; 1000], 100), 1.0);
        let mut fade = vec![0.5_f32; 1000];
        fade[950..].iter_mut().for_each(|s| *s = 0.0);
        assert_eq!(loop_seamlessness(&fade, 100), 0.0);
    }

    #[test]
    fn test_dynamic_range_and_lufs() {
        assert_eq!(dynamic_range_db(&[]), 0.0);
        assert_eq!(dynamic_range_db(&[0.1, 0.1]), 0.0);
        assert!((dynamic_range_db(&[0.0, 0.2]) - 20.0 * 2.0_f64.log10()).abs() < 1e-12);
        assert!((lufs_estimate(&[]) - (-163.0)).abs() < 1e-9);
    }
}
