//! Onset strength, tempo estimation, beat tracking and peak picking.

use somnia_spec::PeakPickConfig;

use crate::stft::{mean_std, Spectrogram};

/// Dynamic range kept below the loudest bin when converting to dB.
const TOP_DB: f64 = 80.0;

/// Penalty weight for beat intervals that deviate from the tempo period.
const BEAT_TIGHTNESS: f64 = 100.0;

/// Half-wave rectified log-spectral flux, one value per frame.
///
/// The first frame is always 0.
pub fn onset_strength(spec: &Spectrogram) -> Vec<f64> {
    if spec.frames.is_empty() {
        return Vec::new();
    }

    let db: Vec<Vec<f64>> = spec
        .frames
        .iter()
        .map(|frame| {
            frame
                .iter()
                .map(|m| 10.0 * (m * m).max(1e-10).log10())
                .collect()
        })
        .collect();
    let max_db = db
        .iter()
        .flat_map(|f| f.iter())
        .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let floor = max_db - TOP_DB;

    let mut onset = Vec::with_capacity(db.len());
    onset.push(0.0);
    for pair in db.windows(2) {
        let flux: f64 = pair[1]
            .iter()
            .zip(&pair[0])
            .map(|(cur, prev)| (cur.max(floor) - prev.max(floor)).max(0.0))
            .sum();
        onset.push(flux / pair[1].len() as f64);
    }
    onset
}

/// Result of tempo estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoEstimate {
    pub bpm: f64,
    /// Beat period in frames.
    pub period: usize,
    /// Normalized autocorrelation at the chosen period, in [0, 1].
    pub confidence: f64,
}

/// Estimates tempo from the onset envelope autocorrelation.
///
/// Lags are restricted to `[min_bpm, max_bpm]` and weighted by a log-normal
/// prior centered on 120 BPM. Returns `None` when the envelope is flat or too
/// short to hold one period.
pub fn estimate_tempo(
    onset: &[f64],
    frame_rate: f64,
    min_bpm: f64,
    max_bpm: f64,
) -> Option<TempoEstimate> {
    let n = onset.len();
    if n < 2 {
        return None;
    }
    let lag_min = ((60.0 * frame_rate / max_bpm).ceil() as usize).max(1);
    let lag_max = ((60.0 * frame_rate / min_bpm).floor() as usize).min(n - 1);
    if lag_min > lag_max {
        return None;
    }

    let (mean, _) = mean_std(onset);
    let centered: Vec<f64> = onset.iter().map(|v| v - mean).collect();
    let ac0: f64 = centered.iter().map(|v| v * v).sum();
    if ac0 <= 1e-12 {
        return None;
    }

    let mut best: Option<(usize, f64, f64)> = None;
    for lag in lag_min..=lag_max {
        let ac: f64 = centered[lag..]
            .iter()
            .zip(&centered[..n - lag])
            .map(|(a, b)| a * b)
            .sum();
        let bpm = 60.0 * frame_rate / lag as f64;
        let weight = (-0.5 * (bpm / 120.0).log2().powi(2)).exp();
        let score = ac * weight;
        if best.map_or(true, |(_, s, _)| score > s) {
            best = Some((lag, score, ac));
        }
    }

    best.map(|(lag, _, ac)| TempoEstimate {
        bpm: 60.0 * frame_rate / lag as f64,
        period: lag,
        confidence: (ac / ac0).clamp(0.0, 1.0),
    })
}

/// Dynamic-programming beat tracker.
///
/// Each frame's score is its onset strength plus the best predecessor score
/// one period earlier, penalized by the log-deviation from `period`. Weak
/// beats at either end are trimmed.
pub fn track_beats(onset: &[f64], period: usize) -> Vec<usize> {
    let n = onset.len();
    if n == 0 || period == 0 {
        return Vec::new();
    }
    let (_, std) = mean_std(onset);
    if std <= 0.0 {
        return Vec::new();
    }
    let env: Vec<f64> = onset.iter().map(|v| v / std).collect();

    let p = period as f64;
    let mut score = vec![0.0; n];
    let mut backlink: Vec<Option<usize>> = vec![None; n];

    for t in 0..n {
        let lo = t.saturating_sub(2 * period);
        let hi = t.saturating_sub((period / 2).max(1));
        let mut best: Option<(usize, f64)> = None;
        if t > 0 {
            for prev in lo..=hi.min(t - 1) {
                let gap = (t - prev) as f64;
                let candidate = score[prev] - BEAT_TIGHTNESS * (gap / p).ln().powi(2);
                if best.map_or(true, |(_, s)| candidate > s) {
                    best = Some((prev, candidate));
                }
            }
        }
        match best {
            Some((prev, s)) if s > 0.0 => {
                score[t] = env[t] + s;
                backlink[t] = Some(prev);
            }
            _ => score[t] = env[t],
        }
    }

    let tail_start = n.saturating_sub(period);
    let mut cursor = (tail_start..n).fold(tail_start, |best, t| {
        if score[t] > score[best] {
            t
        } else {
            best
        }
    });

    let mut beats = vec![cursor];
    while let Some(prev) = backlink[cursor] {
        beats.push(prev);
        cursor = prev;
    }
    beats.reverse();

    let (mean_env, _) = mean_std(&env);
    let threshold = 0.5 * mean_env;
    while beats.first().is_some_and(|&b| env[b] < threshold) {
        beats.remove(0);
    }
    while beats.last().is_some_and(|&b| env[b] < threshold) {
        beats.pop();
    }
    beats
}

/// Picks local peaks of `x`.
///
/// Frame `n` is a peak when it equals the maximum of
/// `x[n - pre_max ..= n + post_max]`, is at least `delta` above the mean of
/// `x[n - pre_avg ..= n + post_avg]`, and lies more than `wait` frames after
/// the previous peak.
pub fn peak_pick(x: &[f64], config: &PeakPickConfig) -> Vec<usize> {
    let n = x.len();
    let mut peaks: Vec<usize> = Vec::new();
    for i in 0..n {
        let max_lo = i.saturating_sub(config.pre_max);
        let max_hi = (i + config.post_max + 1).min(n);
        let local_max = x[max_lo..max_hi]
            .iter()
            .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        if x[i] < local_max {
            continue;
        }

        let avg_lo = i.saturating_sub(config.pre_avg);
        let avg_hi = (i + config.post_avg + 1).min(n);
        let window = &x[avg_lo..avg_hi];
        let local_mean = window.iter().sum::<f64>() / window.len() as f64;
        if x[i] < local_mean + config.delta {
            continue;
        }

        if peaks.last().is_some_and(|&last| i - last <= config.wait) {
            continue;
        }
        peaks.push(i);
    }
    peaks
}

/// Differences between consecutive indices.
pub fn intervals(indices: &[usize]) -> Vec<f64> {
    indices.windows(2).map(|w| (w[1] - w[0]) as f64).collect()
}
