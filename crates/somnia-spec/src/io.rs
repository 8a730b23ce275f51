//! Decoder and encoder seams.
//!
//! Container and codec handling lives outside the engine. Implementations of
//! these traits turn files into [`AudioBuffer`]s at the engine rate and write
//! finished mixes back out.

use std::path::Path;

use crate::buffer::AudioBuffer;
use crate::error::{DecodeError, EncodeError};
use crate::request::MixTags;

/// Turns a file into a decoded buffer.
pub trait AudioDecoder: Send + Sync {
    /// Decodes `path` completely into memory.
    fn decode(&self, path: &Path) -> Result<AudioBuffer, DecodeError>;
}

/// Writes a finished buffer with tags.
pub trait AudioEncoder: Send + Sync {
    /// Encodes `buffer` to `path`, embedding `tags`.
    fn encode(&self, buffer: &AudioBuffer, tags: &MixTags, path: &Path) -> Result<(), EncodeError>;
}
