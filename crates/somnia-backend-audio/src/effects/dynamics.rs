//! Dynamics processing: static soft-knee compressor.

use crate::error::{MixError, MixResult};

/// Converts linear amplitude to decibels.
pub fn amp_to_db(amp: f64) -> f64 {
    20.0 * amp.abs().max(1e-10).log10()
}

/// Converts decibels to linear amplitude.
pub fn db_to_amp(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Compresses one sample against a linear threshold.
///
/// The part of `|x|` above `threshold` is divided by `ratio` and the sign is
/// restored. Samples at or below the threshold pass through untouched.
#[inline]
pub fn compress_sample(x: f64, threshold: f64, ratio: f64) -> f64 {
    let mag = x.abs();
    if mag <= threshold {
        return x;
    }
    let scale = (threshold + (mag - threshold) / ratio) / mag;
    x * scale
}

/// Applies the compressor to every channel.
///
/// There is no envelope follower: gain is computed per sample, so the
/// processor has no attack or release and is fully deterministic.
///
/// # Arguments
/// * `channels` - Planar audio, modified in place
/// * `threshold_db` - Threshold in dBFS, -60 to 0
/// * `ratio` - Compression ratio, 1 to 20
pub fn apply_compressor(channels: &mut [Vec<f64>], threshold_db: f64, ratio: f64) -> MixResult<()> {
    if !(-60.0..=0.0).contains(&threshold_db) {
        return Err(MixError::invalid_param(
            "compressor.threshold_db",
            format!("must be -60 to 0, got {}", threshold_db),
        ));
    }
    if !(1.0..=20.0).contains(&ratio) {
        return Err(MixError::invalid_param(
            "compressor.ratio",
            format!("must be 1.0-20.0, got {}", ratio),
        ));
    }

    let threshold = db_to_amp(threshold_db);
    for channel in channels.iter_mut() {
        for sample in channel.iter_mut() {
            *sample = compress_sample(*sample, threshold, ratio);
        }
    }

    Ok(())
}
