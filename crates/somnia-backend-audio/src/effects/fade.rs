//! Linear fades and crossfade gain curves.

use std::f64::consts::FRAC_PI_2;

/// Gain curve used when two clips overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossfadeCurve {
    /// Gains sum to one.
    Linear,
    /// Squared gains sum to one.
    #[default]
    EqualPower,
}

/// Returns `(outgoing, incoming)` gains at position `t` in `[0, 1]`.
#[inline]
pub fn crossfade_gains(curve: CrossfadeCurve, t: f64) -> (f64, f64) {
    let t = t.clamp(0.0, 1.0);
    match curve {
        CrossfadeCurve::Linear => (1.0 - t, t),
        CrossfadeCurve::EqualPower => ((t * FRAC_PI_2).cos(), (t * FRAC_PI_2).sin()),
    }
}

/// Ramps the first `frames` samples linearly from 0 to 1.
pub fn fade_in(samples: &mut [f64], frames: usize) {
    let frames = frames.min(samples.len());
    if frames == 0 {
        return;
    }
    for (i, s) in samples[..frames].iter_mut().enumerate() {
        *s *= i as f64 / frames as f64;
    }
}

/// Ramps the last `frames` samples linearly from 1 to 0.
///
/// The final sample is always zero.
pub fn fade_out(samples: &mut [f64], frames: usize) {
    let len = samples.len();
    let frames = frames.min(len);
    if frames == 0 {
        return;
    }
    let start = len - frames;
    for (i, s) in samples[start..].iter_mut().enumerate() {
        *s *= (frames - 1 - i) as f64 / frames as f64;
    }
}

/// Applies a fade-in and a fade-out to every channel.
///
/// When the fades together exceed the buffer they overlap and multiply.
pub fn apply_fades(channels: &mut [Vec<f64>], fade_in_frames: usize, fade_out_frames: usize) {
    for channel in channels.iter_mut() {
        fade_in(channel, fade_in_frames);
        fade_out(channel, fade_out_frames);
    }
}
