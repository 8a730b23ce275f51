//! Mel-frequency cepstral coefficients.
//!
//! Power spectrum → triangular mel filterbank → log energy → DCT-II.

use crate::stft::Spectrogram;

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank spanning 0 Hz to Nyquist.
#[derive(Debug, Clone)]
pub struct MelFilterBank {
    /// One weight row per filter, `num_bins` long.
    filters: Vec<Vec<f64>>,
}

impl MelFilterBank {
    /// Builds `num_mels` filters for an `n_fft`-point spectrum.
    pub fn new(num_mels: usize, sample_rate: u32, n_fft: usize) -> Self {
        let num_bins = n_fft / 2 + 1;
        let nyquist = sample_rate as f64 / 2.0;
        let mel_max = hz_to_mel(nyquist);
        let edges: Vec<f64> = (0..num_mels + 2)
            .map(|i| mel_to_hz(mel_max * i as f64 / (num_mels + 1) as f64))
            .collect();
        let bin_hz = sample_rate as f64 / n_fft as f64;

        let filters = (0..num_mels)
            .map(|m| {
                let (lo, center, hi) = (edges[m], edges[m + 1], edges[m + 2]);
                (0..num_bins)
                    .map(|k| {
                        let f = k as f64 * bin_hz;
                        if f <= lo || f >= hi {
                            0.0
                        } else if f <= center {
                            (f - lo) / (center - lo)
                        } else {
                            (hi - f) / (hi - center)
                        }
                    })
                    .collect()
            })
            .collect();

        Self { filters }
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if the bank has no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Applies the bank to one power spectrum frame.
    pub fn apply(&self, power: &[f64]) -> Vec<f64> {
        self.filters
            .iter()
            .map(|w| w.iter().zip(power).map(|(a, b)| a * b).sum())
            .collect()
    }
}

/// Computes `num_mfcc` coefficients per spectrogram frame.
pub fn mfcc(spec: &Spectrogram, num_mels: usize, num_mfcc: usize) -> Vec<Vec<f64>> {
    let bank = MelFilterBank::new(num_mels, spec.sample_rate, spec.n_fft);

    // Orthonormal DCT-II basis
    let scale0 = (1.0 / num_mels as f64).sqrt();
    let scale = (2.0 / num_mels as f64).sqrt();
    let basis: Vec<Vec<f64>> = (0..num_mfcc)
        .map(|k| {
            (0..num_mels)
                .map(|n| {
                    let c = (std::f64::consts::PI * k as f64 * (n as f64 + 0.5) / num_mels as f64)
                        .cos();
                    c * if k == 0 { scale0 } else { scale }
                })
                .collect()
        })
        .collect();

    spec.frames
        .iter()
        .map(|frame| {
            let power: Vec<f64> = frame.iter().map(|m| m * m).collect();
            let log_mel: Vec<f64> = bank
                .apply(&power)
                .into_iter()
                .map(|e| 10.0 * e.max(1e-10).log10())
                .collect();
            basis
                .iter()
                .map(|b| b.iter().zip(&log_mel).map(|(w, e)| w * e).sum())
                .collect()
        })
        .collect()
}
