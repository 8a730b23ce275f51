//! Per-category bed construction.

use rand::Rng;
use somnia_spec::AudioBuffer;
use tracing::debug;

use crate::effects::{crossfade_gains, CrossfadeCurve};
use crate::processing::normalize;

/// Builds one continuous bed per category from randomly chosen clips.
#[derive(Debug, Clone)]
pub struct CategoryMixer {
    /// Overlap between consecutive clips.
    crossfade_frames: usize,
    /// Output channel count.
    num_channels: usize,
    /// Output sample rate.
    sample_rate: u32,
    curve: CrossfadeCurve,
    /// Peak level each clip is normalized to, if any.
    clip_headroom_db: Option<f64>,
}

impl CategoryMixer {
    /// Creates a new category mixer.
    ///
    /// # Arguments
    /// * `crossfade_frames` - Overlap between consecutive clips in frames
    /// * `num_channels` - Channel count of the bed
    /// * `sample_rate` - Sample rate of the bed in Hz
    pub fn new(crossfade_frames: usize, num_channels: usize, sample_rate: u32) -> Self {
        Self {
            crossfade_frames,
            num_channels: num_channels.max(1),
            sample_rate,
            curve: CrossfadeCurve::default(),
            clip_headroom_db: None,
        }
    }

    /// Sets the crossfade curve.
    pub fn with_curve(mut self, curve: CrossfadeCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Peak-normalizes every clip to `headroom_db` before use.
    pub fn with_clip_headroom(mut self, headroom_db: f64) -> Self {
        self.clip_headroom_db = Some(headroom_db);
        self
    }

    /// Builds a bed of exactly `target_frames` frames.
    ///
    /// Clips are drawn uniformly with replacement from `sources` using `rng`.
    /// The first clip is copied as is; every later clip overlaps the tail of
    /// the bed by the crossfade length, capped at half the clip and at the
    /// current bed length. Empty clips are ignored. With no usable clips the
    /// bed is silent.
    ///
    /// `sources` is never modified.
    pub fn build<R: Rng + ?Sized>(
        &self,
        sources: &[AudioBuffer],
        target_frames: usize,
        rng: &mut R,
    ) -> AudioBuffer {
        let clips = self.prepare(sources);
        if clips.is_empty() || target_frames == 0 {
            return AudioBuffer::silent(target_frames, self.num_channels, self.sample_rate);
        }

        let longest = clips.iter().map(|c| clip_len(c)).max().unwrap_or(0);
        let mut bed: Vec<Vec<f64>> = (0..self.num_channels)
            .map(|_| Vec::with_capacity(target_frames + longest))
            .collect();
        let mut appended = 0usize;

        while bed[0].len() < target_frames {
            let clip = &clips[rng.gen_range(0..clips.len())];
            self.append(&mut bed, clip);
            appended += 1;
        }

        for channel in bed.iter_mut() {
            channel.truncate(target_frames);
        }
        debug!(clips = appended, frames = target_frames, "built category bed");

        AudioBuffer::from_channels(bed, self.sample_rate).unwrap_or_else(|_| {
            AudioBuffer::silent(target_frames, self.num_channels, self.sample_rate)
        })
    }

    /// Conformed, optionally normalized copies of the non-empty sources.
    fn prepare(&self, sources: &[AudioBuffer]) -> Vec<Vec<Vec<f64>>> {
        sources
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| {
                let mut channels = s.conform_channels(self.num_channels).into_channels();
                if let Some(headroom) = self.clip_headroom_db {
                    normalize(&mut channels, headroom);
                }
                channels
            })
            .collect()
    }

    fn append(&self, bed: &mut [Vec<f64>], clip: &[Vec<f64>]) {
        let bed_len = bed[0].len();
        let len = clip_len(clip);
        let overlap = if bed_len == 0 {
            0
        } else {
            self.crossfade_frames.min(len / 2).min(bed_len)
        };
        let start = bed_len - overlap;

        for (dst, src) in bed.iter_mut().zip(clip.iter()) {
            for i in 0..overlap {
                let t = (i + 1) as f64 / (overlap + 1) as f64;
                let (out_gain, in_gain) = crossfade_gains(self.curve, t);
                dst[start + i] = dst[start + i] * out_gain + src[i] * in_gain;
            }
            dst.extend_from_slice(&src[overlap..]);
        }
    }
}

fn clip_len(clip: &[Vec<f64>]) -> usize {
    clip.first().map_or(0, Vec::len)
}
