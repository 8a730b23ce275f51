//! Mutable master buffer and its frozen, exportable form.

use somnia_spec::AudioBuffer;

/// The mix under construction.
///
/// Created at the target length and never resized; every stage writes into
/// the same channels. A finished master is turned into a [`FrozenMaster`]
/// with [`MasterBuffer::freeze`].
#[derive(Debug, Clone, PartialEq)]
pub struct MasterBuffer {
    channels: Vec<Vec<f64>>,
    sample_rate: u32,
}

impl MasterBuffer {
    /// Creates a silent master of `num_frames` frames.
    pub fn silent(num_frames: usize, num_channels: usize, sample_rate: u32) -> Self {
        Self {
            channels: vec![vec![0.0; num_frames]; num_channels.max(1)],
            sample_rate,
        }
    }

    /// Wraps an existing buffer.
    pub fn from_buffer(buffer: AudioBuffer) -> Self {
        let sample_rate = buffer.sample_rate();
        Self {
            channels: buffer.into_channels(),
            sample_rate,
        }
    }

    /// Number of frames.
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Borrows the channels.
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Mutable access for in-place processing. Channel lengths must not change.
    pub(crate) fn channels_mut(&mut self) -> &mut [Vec<f64>] {
        &mut self.channels
    }

    /// Largest absolute sample.
    pub fn peak(&self) -> f64 {
        crate::processing::peak(&self.channels)
    }

    /// Returns true if every sample is zero.
    pub fn is_silent(&self) -> bool {
        self.channels.iter().flat_map(|c| c.iter()).all(|&s| s == 0.0)
    }

    /// Adds `buffer` scaled by `gain` onto the master, sample by sample.
    ///
    /// Frames past the end of the master are dropped. A mono source feeds
    /// every master channel; otherwise master channel `c` reads source
    /// channel `c % n`.
    pub fn overlay(&mut self, buffer: &AudioBuffer, gain: f64) {
        let src_channels = buffer.channels();
        if src_channels.is_empty() {
            return;
        }
        for (c, dst) in self.channels.iter_mut().enumerate() {
            let src = &src_channels[c % src_channels.len()];
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d += s * gain;
            }
        }
    }

    /// Duplicates a mono master into two channels. Wider masters are unchanged.
    pub fn upmix_to_stereo(&mut self) {
        if self.channels.len() == 1 {
            let mono = self.channels[0].clone();
            self.channels.push(mono);
        }
    }

    /// Finishes the master.
    pub fn freeze(self) -> FrozenMaster {
        let sample_rate = self.sample_rate;
        let buffer = AudioBuffer::from_channels(self.channels, sample_rate)
            .unwrap_or_else(|_| AudioBuffer::silent(0, 1, sample_rate));
        FrozenMaster { buffer }
    }
}

/// A finished, read-only mix.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenMaster {
    buffer: AudioBuffer,
}

impl FrozenMaster {
    /// Borrows the audio.
    pub fn buffer(&self) -> &AudioBuffer {
        &self.buffer
    }

    /// Consumes the master, returning the audio.
    pub fn into_buffer(self) -> AudioBuffer {
        self.buffer
    }

    /// Length in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.buffer.duration_ms()
    }

    /// Number of frames.
    pub fn num_frames(&self) -> usize {
        self.buffer.num_frames()
    }
}
