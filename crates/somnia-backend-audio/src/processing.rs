//! Level and silence utilities shared by the mix stages.
//!
//! All functions work on planar channels so a stereo pair is scaled by one
//! gain and keeps its image.

use somnia_spec::AudioBuffer;

use crate::effects::db_to_amp;

/// Default RMS target for [`normalize_to_dbfs`].
pub const DEFAULT_TARGET_DBFS: f64 = -20.0;
/// Default threshold for [`trim_silence`].
pub const DEFAULT_SILENCE_THRESHOLD_DB: f64 = -40.0;
/// Default minimum silence run for [`trim_silence`].
pub const DEFAULT_MIN_SILENCE_MS: u64 = 500;

/// Largest absolute sample across all channels.
pub fn peak(channels: &[Vec<f64>]) -> f64 {
    channels
        .iter()
        .flat_map(|c| c.iter())
        .map(|s| s.abs())
        .fold(0.0_f64, |a, b| a.max(b))
}

fn scale(channels: &mut [Vec<f64>], gain: f64) {
    for channel in channels.iter_mut() {
        for sample in channel.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Normalizes the peak to `headroom_db` dBFS.
///
/// # Arguments
/// * `channels` - Planar audio to normalize
/// * `headroom_db` - Headroom in dB below 0 dBFS (e.g., -1.0)
///
/// Silent input is left alone.
pub fn normalize(channels: &mut [Vec<f64>], headroom_db: f64) {
    let target_peak = db_to_amp(headroom_db);
    let current_peak = peak(channels);

    if current_peak > 0.0 {
        scale(channels, target_peak / current_peak);
    }
}

/// Normalizes the RMS level to `target_dbfs`.
///
/// Silent input is left alone.
pub fn normalize_to_dbfs(channels: &mut [Vec<f64>], target_dbfs: f64) {
    let count: usize = channels.iter().map(Vec::len).sum();
    if count == 0 {
        return;
    }
    let sum: f64 = channels.iter().flat_map(|c| c.iter()).map(|s| s * s).sum();
    let rms = (sum / count as f64).sqrt();
    if rms > 0.0 {
        scale(channels, db_to_amp(target_dbfs) / rms);
    }
}

/// Scales the signal down so no sample exceeds `ceiling`.
///
/// Signals already within the ceiling are untouched.
pub fn limit_peak(channels: &mut [Vec<f64>], ceiling: f64) {
    let current_peak = peak(channels);
    if current_peak > ceiling && current_peak > 0.0 {
        scale(channels, ceiling / current_peak);
    }
}

/// Strips leading and trailing silence.
///
/// A frame is silent when every channel is at or below `threshold_db`. Edge
/// runs shorter than `min_silence_ms` are kept. A buffer that is silent
/// throughout and longer than the minimum run collapses to zero frames.
///
/// # Returns
/// A new buffer; the input is not modified.
pub fn trim_silence(buffer: &AudioBuffer, threshold_db: f64, min_silence_ms: u64) -> AudioBuffer {
    let threshold = db_to_amp(threshold_db);
    let frames = buffer.num_frames();
    let min_frames = AudioBuffer::frames_for_ms(min_silence_ms, buffer.sample_rate());
    let loud = |i: usize| buffer.channels().iter().any(|c| c[i].abs() > threshold);

    let Some(first) = (0..frames).find(|&i| loud(i)) else {
        if frames > min_frames {
            return AudioBuffer::silent(0, buffer.num_channels(), buffer.sample_rate());
        }
        return buffer.clone();
    };
    // `first` exists, so a last loud frame does too.
    let last = (0..frames).rev().find(|&i| loud(i)).unwrap_or(first);

    let start = if first >= min_frames { first } else { 0 };
    let trailing = frames - 1 - last;
    let end = if trailing >= min_frames { last + 1 } else { frames };

    if start == 0 && end == frames {
        return buffer.clone();
    }

    let channels = buffer
        .channels()
        .iter()
        .map(|c| c[start..end].to_vec())
        .collect();
    AudioBuffer::from_channels(channels, buffer.sample_rate())
        .unwrap_or_else(|_| buffer.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_peak() {
        let mut channels = vec![vec![0.25, -0.5], vec![0.1, 0.0]];
        normalize(&mut channels, 0.0);
        assert!((peak(&channels) - 1.0).abs() < 1e-12);
        assert!((channels[0][0] - 0.5).abs() < 1e-12);
        assert!((channels[1][0] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_silence_untouched() {
        let mut channels = vec![vec![0.0; 16]];
        normalize(&mut channels, -1.0);
        assert_eq!(channels, vec![vec![0.0; 16]]);
    }

    #[test]
    fn test_normalize_to_dbfs() {
        let mut channels = vec![vec![0.5, -0.5, 0.5, -0.5]];
        normalize_to_dbfs(&mut channels, -20.0);
        assert!((channels[0][0].abs() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_limit_peak_only_reduces() {
        let mut quiet = vec![vec![0.2, -0.4]];
        limit_peak(&mut quiet, 1.0);
        assert_eq!(quiet, vec![vec![0.2, -0.4]]);

        let mut loud = vec![vec![2.0, -1.0]];
        limit_peak(&mut loud, 1.0);
        assert_eq!(loud, vec![vec![1.0, -0.5]]);
    }

    #[test]
    fn test_trim_silence_strips_long_edges() {
        let sr = 1000;
        let mut samples = vec![0.0; 600];
        samples.extend(vec![0.5; 100]);
        samples.extend(vec![0.0; 700]);
        let buffer = AudioBuffer::mono(samples, sr);

        let trimmed = trim_silence(&buffer, -40.0, 500);
        assert_eq!(trimmed.num_frames(), 100);
        assert!(trimmed.channel(0).unwrap().iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_trim_silence_keeps_short_edges() {
        let sr = 1000;
        let mut samples = vec![0.0; 100];
        samples.extend(vec![0.5; 100]);
        samples.extend(vec![0.0; 600]);
        let buffer = AudioBuffer::mono(samples, sr);

        let trimmed = trim_silence(&buffer, -40.0, 500);
        assert_eq!(trimmed.num_frames(), 200);
    }

    #[test]
    fn test_trim_all_silent() {
        let buffer = AudioBuffer::silent(2000, 2, 1000);
        let trimmed = trim_silence(&buffer, -40.0, 500);
        assert!(trimmed.is_empty());
        assert_eq!(trimmed.num_channels(), 2);
    }
}
