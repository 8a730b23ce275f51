//! Decoded, in-memory audio.
//!
//! An [`AudioBuffer`] holds planar `f64` channels at a fixed sample rate. It is
//! the sole input to every analyzer and the unit that flows between mix
//! stages. Buffers are immutable once built; stages that need to modify audio
//! take the channels out with [`AudioBuffer::into_channels`] and wrap the
//! result in a new buffer.

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Planar multi-channel audio with a sample rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBuffer {
    channels: Vec<Vec<f64>>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Creates a buffer from planar channels.
    ///
    /// # Errors
    /// Returns [`SpecError::InvalidBuffer`] if there are no channels, the
    /// channels differ in length, or the sample rate is zero.
    pub fn from_channels(channels: Vec<Vec<f64>>, sample_rate: u32) -> Result<Self, SpecError> {
        if channels.is_empty() {
            return Err(SpecError::invalid_buffer("at least one channel is required"));
        }
        if sample_rate == 0 {
            return Err(SpecError::invalid_buffer("sample rate must be positive"));
        }
        let frames = channels[0].len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(SpecError::invalid_buffer("channels must have equal length"));
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Creates a mono buffer.
    pub fn mono(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            channels: vec![samples],
            sample_rate: sample_rate.max(1),
        }
    }

    /// Creates a stereo buffer. The longer channel is truncated to the shorter.
    pub fn stereo(mut left: Vec<f64>, mut right: Vec<f64>, sample_rate: u32) -> Self {
        let len = left.len().min(right.len());
        left.truncate(len);
        right.truncate(len);
        Self {
            channels: vec![left, right],
            sample_rate: sample_rate.max(1),
        }
    }

    /// Creates a silent buffer of `num_frames` frames.
    pub fn silent(num_frames: usize, num_channels: usize, sample_rate: u32) -> Self {
        Self {
            channels: vec![vec![0.0; num_frames]; num_channels.max(1)],
            sample_rate: sample_rate.max(1),
        }
    }

    /// Creates a buffer from interleaved samples.
    ///
    /// Trailing samples that do not complete a frame are dropped.
    pub fn from_interleaved(
        samples: &[f64],
        num_channels: usize,
        sample_rate: u32,
    ) -> Result<Self, SpecError> {
        if num_channels == 0 {
            return Err(SpecError::invalid_buffer("at least one channel is required"));
        }
        let frames = samples.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in samples.chunks_exact(num_channels) {
            for (ch, &s) in channels.iter_mut().zip(frame) {
                ch.push(s);
            }
        }
        Self::from_channels(channels, sample_rate)
    }

    /// Number of frames that make up `ms` milliseconds at `sample_rate`.
    pub fn frames_for_ms(ms: u64, sample_rate: u32) -> usize {
        (ms * sample_rate as u64 / 1000) as usize
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Returns true if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.num_frames() as f64 * 1000.0 / self.sample_rate as f64
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Borrows one channel.
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Borrows all channels.
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Consumes the buffer, returning its planar channels.
    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels
    }

    /// Averages all channels into one.
    pub fn to_mono(&self) -> Vec<f64> {
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }
        let scale = 1.0 / self.channels.len() as f64;
        (0..self.num_frames())
            .map(|i| self.channels.iter().map(|c| c[i]).sum::<f64>() * scale)
            .collect()
    }

    /// Mono downmix as `f32`, the precision the analyzers work in.
    pub fn mono_f32(&self) -> Vec<f32> {
        self.to_mono().into_iter().map(|s| s as f32).collect()
    }

    /// Returns a copy with `num_channels` channels.
    ///
    /// Mono sources are duplicated; wider sources are averaged down to mono
    /// first and then duplicated.
    pub fn conform_channels(&self, num_channels: usize) -> AudioBuffer {
        let num_channels = num_channels.max(1);
        if self.channels.len() == num_channels {
            return self.clone();
        }
        let mono = self.to_mono();
        AudioBuffer {
            channels: vec![mono; num_channels],
            sample_rate: self.sample_rate,
        }
    }

    /// Interleaves the channels frame by frame.
    pub fn interleaved(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.num_frames() * self.channels.len());
        for i in 0..self.num_frames() {
            for ch in &self.channels {
                out.push(ch[i]);
            }
        }
        out
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f64 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .map(|s| s.abs())
            .fold(0.0_f64, f64::max)
    }

    /// Root mean square over all channels.
    pub fn rms(&self) -> f64 {
        let count = self.num_frames() * self.channels.len();
        if count == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .channels
            .iter()
            .flat_map(|c| c.iter())
            .map(|s| s * s)
            .sum();
        (sum / count as f64).sqrt()
    }

    /// Returns true if every sample is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.channels.iter().flat_map(|c| c.iter()).all(|&s| s == 0.0)
    }
}
