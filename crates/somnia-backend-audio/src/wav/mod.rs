//! WAV decoding and tagged 16-bit WAV export.
//!
//! Export is deterministic for a given buffer and tag set: no timestamps are
//! taken at write time, so the hash of the PCM data identifies a mix.

mod decoder;
mod encoder;
mod format;
mod info;
mod pcm;
mod writer;


// Re-export public API
pub use decoder::WavDecoder;
pub use encoder::WavEncoder;
pub use format::WavFormat;
pub use info::{info_chunk, parse_info_tags};
pub use pcm::{buffer_to_pcm16, compute_pcm_hash, extract_pcm_data, samples_to_pcm16};
pub use writer::{write_wav, write_wav_to_vec};
