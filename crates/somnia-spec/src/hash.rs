//! Content hashing.
//!
//! Clip analysis records are keyed by the BLAKE3 hash of the source file.

use std::path::Path;

/// Hex BLAKE3 hash of a byte slice.
///
/// # Returns
/// A 64-character lowercase hexadecimal string
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Hex BLAKE3 hash of a file's contents.
pub fn file_content_hash(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(content_hash(&bytes))
}
