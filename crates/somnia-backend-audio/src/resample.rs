//! Sample rate conversion using rubato.
//!
//! Decoded clips are brought to the engine rate before analysis or mixing.

use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use somnia_spec::{AudioBuffer, DecodeError};
use tracing::debug;

/// Resamples `buffer` to `output_rate`.
///
/// # Returns
/// The input unchanged when the rates already match or the buffer is empty.
///
/// # Errors
/// Returns [`DecodeError::Unsupported`] if rubato rejects the conversion.
pub fn resample(buffer: AudioBuffer, output_rate: u32) -> Result<AudioBuffer, DecodeError> {
    let input_rate = buffer.sample_rate();
    if input_rate == output_rate {
        debug!("Sample rate already at {}Hz, skipping resample", output_rate);
        return Ok(buffer);
    }
    if buffer.is_empty() {
        return Ok(AudioBuffer::silent(0, buffer.num_channels(), output_rate));
    }

    let input_frames = buffer.num_frames();
    let num_channels = buffer.num_channels();
    debug!(
        "Resampling from {}Hz to {}Hz ({} channels)",
        input_rate, output_rate, num_channels
    );

    let mut resampler = FastFixedIn::<f64>::new(
        output_rate as f64 / input_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        input_frames,
        num_channels,
    )
    .map_err(|e| DecodeError::unsupported(format!("Failed to create resampler: {}", e)))?;

    let planar_output = resampler
        .process(buffer.channels(), None)
        .map_err(|e| DecodeError::unsupported(format!("Resampling failed: {}", e)))?;

    let output = AudioBuffer::from_channels(planar_output, output_rate)
        .map_err(|e| DecodeError::unsupported(format!("Resampling failed: {}", e)))?;

    debug!(
        "Resampled {} input frames to {} output frames",
        input_frames,
        output.num_frames()
    );
    Ok(output)
}
