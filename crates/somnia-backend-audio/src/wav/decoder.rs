//! WAV decoding through hound.

use std::path::Path;

use hound::{SampleFormat, WavReader};
use somnia_spec::{AudioBuffer, AudioDecoder, DecodeError};
use tracing::debug;

use crate::resample::resample;

/// Decodes WAV files to the engine's rate and channel layout.
///
/// Integer files of 8, 16, 24 or 32 bits and 32-bit float files are
/// accepted. Audio at another rate is resampled; channel counts are
/// conformed by duplicating mono or downmixing wider layouts.
#[derive(Debug, Clone, Copy)]
pub struct WavDecoder {
    sample_rate: u32,
    channels: usize,
}

impl WavDecoder {
    /// Creates a decoder producing `channels` channels at `sample_rate`.
    pub fn new(sample_rate: u32, channels: usize) -> Self {
        Self {
            sample_rate,
            channels: channels.max(1),
        }
    }

    /// Reads a WAV file without resampling or conforming channels.
    pub fn read_native(path: &Path) -> Result<AudioBuffer, DecodeError> {
        let mut reader =
            WavReader::open(path).map_err(|e| DecodeError::unreadable(path, e.to_string()))?;
        let spec = reader.spec();
        let num_channels = spec.channels as usize;

        let samples: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<Result<_, _>>()
                .map_err(|e| DecodeError::unreadable(path, e.to_string()))?,
            (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
                let scale = (1u64 << (bits - 1)) as f64;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f64 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| DecodeError::unreadable(path, e.to_string()))?
            }
            (format, bits) => {
                return Err(DecodeError::unsupported(format!(
                    "{:?} WAV with {} bits per sample",
                    format, bits
                )))
            }
        };

        if samples.is_empty() {
            return Err(DecodeError::Empty);
        }

        AudioBuffer::from_interleaved(&samples, num_channels, spec.sample_rate)
            .map_err(|e| DecodeError::unsupported(e.to_string()))
    }
}

impl AudioDecoder for WavDecoder {
    fn decode(&self, path: &Path) -> Result<AudioBuffer, DecodeError> {
        let native = Self::read_native(path)?;
        debug!(
            path = %path.display(),
            sample_rate = native.sample_rate(),
            channels = native.num_channels(),
            frames = native.num_frames(),
            "decoded wav"
        );
        let resampled = resample(native, self.sample_rate)?;
        Ok(resampled.conform_channels(self.channels))
    }
}
