//! RIFF/WAVE serialization.

use std::io::{self, Write};

use super::format::WavFormat;

/// Writes a complete WAV file to a writer.
///
/// # Arguments
/// * `writer` - Output writer
/// * `format` - WAV format parameters
/// * `pcm_data` - Raw PCM samples as bytes
/// * `info` - Optional `LIST` chunk, written between `fmt ` and `data`
pub fn write_wav<W: Write>(
    writer: &mut W,
    format: &WavFormat,
    pcm_data: &[u8],
    info: Option<&[u8]>,
) -> io::Result<()> {
    let data_size = pcm_data.len() as u32;
    let data_pad = data_size % 2;
    let info_len = info.map_or(0, |c| c.len() as u32);
    // Total file size minus 8 bytes for the RIFF header
    let file_size = 4 + 24 + info_len + 8 + data_size + data_pad;

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?; // Chunk size (16 for PCM)
    writer.write_all(&1u16.to_le_bytes())?; // Audio format (1 = PCM)
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    if let Some(chunk) = info {
        writer.write_all(chunk)?;
    }

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;
    if data_pad != 0 {
        writer.write_all(&[0])?;
    }

    Ok(())
}

/// Writes a WAV file to a byte vector.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8], info: Option<&[u8]>) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(44 + info.map_or(0, <[u8]>::len) + pcm_data.len());
    // Writing into a Vec cannot fail.
    let _ = write_wav(&mut buffer, format, pcm_data, info);
    buffer
}
