//! Spectral helpers for checking rendered audio.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Frequency of the strongest FFT bin, in Hz.
///
/// The FFT spans the whole input, so the bin resolution is
/// `sample_rate / samples.len()`.
pub fn dominant_frequency(samples: &[f64], sample_rate: u32) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 0.0;
    }
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    let (bin, _) = buffer[1..n / 2]
        .iter()
        .enumerate()
        .map(|(i, c)| (i + 1, c.norm_sqr()))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    bin as f64 * sample_rate as f64 / n as f64
}

/// Width of one FFT bin for `len` samples, in Hz.
pub fn bin_resolution(len: usize, sample_rate: u32) -> f64 {
    sample_rate as f64 / len.max(1) as f64
}
