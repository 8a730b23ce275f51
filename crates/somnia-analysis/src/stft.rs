//! Short-time Fourier analysis and framing.
//!
//! Frames are centered: the signal is zero-padded by `n_fft / 2` on both sides
//! so frame `t` is centered on sample `t * hop`.

use rustfft::{num_complex::Complex, FftPlanner};

/// Magnitude spectrogram, one row of `n_fft / 2 + 1` bins per frame.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    pub frames: Vec<Vec<f64>>,
    pub n_fft: usize,
    pub hop_length: usize,
    pub sample_rate: u32,
}

impl Spectrogram {
    /// Computes a Hann-windowed magnitude spectrogram.
    ///
    /// # Arguments
    /// * `samples` - Mono samples
    /// * `n_fft` - FFT size (power of two)
    /// * `hop_length` - Hop between frames
    /// * `sample_rate` - Sample rate in Hz
    pub fn compute(samples: &[f32], n_fft: usize, hop_length: usize, sample_rate: u32) -> Self {
        let num_bins = n_fft / 2 + 1;
        let num_frames = if samples.is_empty() {
            0
        } else {
            1 + samples.len() / hop_length
        };

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n_fft);
        let window = hann_window(n_fft);
        let pad = n_fft / 2;

        let mut buffer = vec![Complex::new(0.0_f32, 0.0); n_fft];
        let mut frames = Vec::with_capacity(num_frames);

        for t in 0..num_frames {
            let start = (t * hop_length) as isize - pad as isize;
            for (i, slot) in buffer.iter_mut().enumerate() {
                let idx = start + i as isize;
                let s = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize]
                } else {
                    0.0
                };
                *slot = Complex::new(s * window[i], 0.0);
            }
            fft.process(&mut buffer);
            frames.push(
                buffer
                    .iter()
                    .take(num_bins)
                    .map(|c| (c.re * c.re + c.im * c.im).sqrt() as f64)
                    .collect(),
            );
        }

        Self {
            frames,
            n_fft,
            hop_length,
            sample_rate,
        }
    }

    /// Number of frames.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of frequency bins per frame.
    pub fn num_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Center frequency of bin `k` in Hz.
    pub fn bin_frequency(&self, k: usize) -> f64 {
        k as f64 * self.sample_rate as f64 / self.n_fft as f64
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> f64 {
        self.sample_rate as f64 / self.hop_length as f64
    }

    /// Index range of bins whose frequency falls in `[low_hz, high_hz)`.
    pub fn bin_range(&self, low_hz: f64, high_hz: f64) -> std::ops::Range<usize> {
        let resolution = self.sample_rate as f64 / self.n_fft as f64;
        let lo = (low_hz / resolution).ceil() as usize;
        let hi = ((high_hz / resolution).ceil() as usize).min(self.num_bins());
        lo.min(hi)..hi
    }
}

/// Periodic Hann window.
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
        .collect()
}

/// Centered frame RMS, matching the spectrogram framing.
pub fn frame_rms(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let num_frames = 1 + samples.len() / hop_length;
    let pad = frame_length / 2;
    (0..num_frames)
        .map(|t| {
            let start = (t * hop_length).saturating_sub(pad);
            let end = (t * hop_length + frame_length - pad).min(samples.len());
            let sum: f64 = samples[start..end].iter().map(|&s| (s as f64) * (s as f64)).sum();
            // Zero padding counts toward the frame length.
            (sum / frame_length as f64).sqrt()
        })
        .collect()
}

/// Fraction of adjacent sample pairs that change sign.
pub fn zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f64 / (samples.len() - 1) as f64
}

/// Mean and population standard deviation.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Standard deviation over mean, 0 when the mean is not positive.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let (mean, std) = mean_std(values);
    if mean > 0.0 {
        std / mean
    } else {
        0.0
    }
}
