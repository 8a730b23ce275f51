//! Biquad filters for master frequency shaping.
//!
//! Coefficients follow the Audio EQ Cookbook formulas. A band-pass profile is
//! realised as a low-pass at the upper edge followed by a high-pass at the
//! lower edge, both second order.

use std::f64::consts::PI;

use somnia_spec::FrequencyShaping;

/// Biquad filter coefficients, normalized by `a0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Creates lowpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `q` - Q factor, 0.707 is Butterworth
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn lowpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let (sin_omega, cos_omega) = omega(cutoff, sample_rate);
        let alpha = sin_omega / (2.0 * q.max(0.5));

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        Self::normalized(b0, b1, b2, alpha, cos_omega)
    }

    /// Creates highpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `q` - Q factor
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn highpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let (sin_omega, cos_omega) = omega(cutoff, sample_rate);
        let alpha = sin_omega / (2.0 * q.max(0.5));

        let b0 = (1.0 + cos_omega) / 2.0;
        let b1 = -(1.0 + cos_omega);
        let b2 = (1.0 + cos_omega) / 2.0;
        Self::normalized(b0, b1, b2, alpha, cos_omega)
    }

    fn normalized(b0: f64, b1: f64, b2: f64, alpha: f64, cos_omega: f64) -> Self {
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Cutoffs at or above Nyquist are pulled just below it.
fn omega(freq: f64, sample_rate: f64) -> (f64, f64) {
    let nyquist = sample_rate / 2.0;
    let freq = freq.clamp(1.0, nyquist * 0.999);
    let w = 2.0 * PI * freq / sample_rate;
    (w.sin(), w.cos())
}

/// Biquad filter state (direct form I).
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadFilter {
    /// Creates a new biquad filter with the given coefficients.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Creates a lowpass filter.
    pub fn lowpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        Self::new(BiquadCoeffs::lowpass(cutoff, q, sample_rate))
    }

    /// Creates a highpass filter.
    pub fn highpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        Self::new(BiquadCoeffs::highpass(cutoff, q, sample_rate))
    }

    /// Resets the filter state.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.coeffs.b0 * input + self.coeffs.b1 * self.x1 + self.coeffs.b2 * self.x2
            - self.coeffs.a1 * self.y1
            - self.coeffs.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Processes a buffer of samples in place.
    pub fn process_buffer(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

/// Builds the filter chain for one channel.
pub fn shaping_chain(shaping: &FrequencyShaping, q: f64, sample_rate: f64) -> Vec<BiquadFilter> {
    match *shaping {
        FrequencyShaping::LowPass { cutoff_hz } => {
            vec![BiquadFilter::lowpass(cutoff_hz, q, sample_rate)]
        }
        FrequencyShaping::BandPass { low_hz, high_hz } => vec![
            BiquadFilter::lowpass(high_hz, q, sample_rate),
            BiquadFilter::highpass(low_hz, q, sample_rate),
        ],
    }
}

/// Applies a profile's frequency shaping to every channel of `channels`.
///
/// The chain is reset before each channel so no state leaks between them.
pub fn apply_shaping(
    channels: &mut [Vec<f64>],
    shaping: &FrequencyShaping,
    q: f64,
    sample_rate: u32,
) {
    let mut chain = shaping_chain(shaping, q, sample_rate as f64);
    for channel in channels.iter_mut() {
        for filter in chain.iter_mut() {
            filter.reset();
            filter.process_buffer(channel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    const SR: u32 = 44_100;

    fn sine(freq: f64, frames: usize) -> Vec<f64> {
        (0..frames)
            .map(|i| (2.0 * PI * freq * i as f64 / SR as f64).sin())
            .collect()
    }

    fn tail_peak(samples: &[f64]) -> f64 {
        samples[samples.len() / 2..]
            .iter()
            .fold(0.0f64, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let c = BiquadCoeffs::lowpass(1000.0, FRAC_1_SQRT_2, SR as f64);
        let dc_gain = (c.b0 + c.b1 + c.b2) / (1.0 + c.a1 + c.a2);
        assert!((dc_gain - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let c = BiquadCoeffs::highpass(1000.0, FRAC_1_SQRT_2, SR as f64);
        let dc_gain = (c.b0 + c.b1 + c.b2) / (1.0 + c.a1 + c.a2);
        assert!(dc_gain.abs() < 1e-9);
    }

    #[test]
    fn test_lowpass_attenuates_high_tone() {
        let mut channels = vec![sine(10_000.0, SR as usize)];
        apply_shaping(
            &mut channels,
            &FrequencyShaping::LowPass { cutoff_hz: 500.0 },
            FRAC_1_SQRT_2,
            SR,
        );
        assert!(tail_peak(&channels[0]) < 0.05);
    }

    #[test]
    fn test_bandpass_keeps_mid_and_cuts_edges() {
        let shaping = FrequencyShaping::BandPass {
            low_hz: 500.0,
            high_hz: 6000.0,
        };
        let mut channels = vec![
            sine(2000.0, SR as usize),
            sine(40.0, SR as usize),
            sine(18_000.0, SR as usize),
        ];
        apply_shaping(&mut channels, &shaping, FRAC_1_SQRT_2, SR);

        assert!(tail_peak(&channels[0]) > 0.8);
        assert!(tail_peak(&channels[1]) < 0.05);
        assert!(tail_peak(&channels[2]) < 0.15);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = BiquadFilter::lowpass(1000.0, FRAC_1_SQRT_2, SR as f64);
        let first = filter.process(1.0);
        filter.process_buffer(&mut sine(300.0, 256));
        filter.reset();
        assert_eq!(filter.process(1.0), first);
    }

    #[test]
    fn test_channels_do_not_share_filter_state() {
        let shaping = FrequencyShaping::BandPass {
            low_hz: 200.0,
            high_hz: 4000.0,
        };
        let mut channels = vec![sine(1000.0, 2048), sine(1000.0, 2048)];
        apply_shaping(&mut channels, &shaping, FRAC_1_SQRT_2, SR);
        assert_eq!(channels[0], channels[1]);
    }

    #[test]
    fn test_cutoff_above_nyquist_is_stable() {
        let mut filter = BiquadFilter::lowpass(40_000.0, FRAC_1_SQRT_2, SR as f64);
        let mut samples = sine(1000.0, 4096);
        filter.process_buffer(&mut samples);
        assert!(samples.iter().all(|s| s.is_finite() && s.abs() < 2.0));
    }
}
