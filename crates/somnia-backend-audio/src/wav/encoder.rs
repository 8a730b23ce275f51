//! Tagged 16-bit WAV export.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use somnia_spec::{AudioBuffer, AudioEncoder, EncodeError, MixTags};
use tracing::info;

use super::format::WavFormat;
use super::info::info_chunk;
use super::pcm::buffer_to_pcm16;
use super::writer::{write_wav, write_wav_to_vec};

/// Writes mixes as 16-bit PCM WAV files with a `LIST/INFO` tag chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavEncoder;

impl WavEncoder {
    /// Creates a new encoder.
    pub fn new() -> Self {
        Self
    }

    /// Encodes to an in-memory WAV file.
    pub fn encode_to_vec(
        &self,
        buffer: &AudioBuffer,
        tags: &MixTags,
    ) -> Result<Vec<u8>, EncodeError> {
        let format = WavFormat::for_buffer(buffer)?;
        let pcm = buffer_to_pcm16(buffer);
        Ok(write_wav_to_vec(&format, &pcm, Some(&info_chunk(tags))))
    }
}

impl AudioEncoder for WavEncoder {
    fn encode(&self, buffer: &AudioBuffer, tags: &MixTags, path: &Path) -> Result<(), EncodeError> {
        let format = WavFormat::for_buffer(buffer)?;
        let pcm = buffer_to_pcm16(buffer);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        write_wav(&mut writer, &format, &pcm, Some(&info_chunk(tags)))?;
        writer.flush()?;

        info!(
            path = %path.display(),
            frames = buffer.num_frames(),
            title = %tags.title,
            "exported mix"
        );
        Ok(())
    }
}
