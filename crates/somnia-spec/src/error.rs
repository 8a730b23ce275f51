//! Error types shared across the Somnia crates.
//!
//! Every backend error implements [`BackendError`] so that callers can report
//! a stable code and category regardless of which stage failed.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or validating data model values.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A buffer was constructed from channels of unequal length.
    #[error("invalid audio buffer: {message}")]
    InvalidBuffer {
        /// Error message.
        message: String,
    },

    /// A configuration value is out of range.
    #[error("invalid config field '{field}': {message}")]
    InvalidConfig {
        /// Dotted path of the offending field.
        field: String,
        /// Error message.
        message: String,
    },

    /// No profile is registered under the requested mix type.
    #[error("no mix profile registered for '{name}'")]
    InvalidProfile {
        /// The requested mix type.
        name: String,
    },

    /// A category string did not match any known label.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpecError {
    /// Creates an invalid config error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid buffer error.
    pub fn invalid_buffer(message: impl Into<String>) -> Self {
        Self::InvalidBuffer {
            message: message.into(),
        }
    }
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::InvalidBuffer { .. } => "SPEC_001",
            SpecError::InvalidConfig { .. } => "SPEC_002",
            SpecError::InvalidProfile { .. } => "SPEC_003",
            SpecError::UnknownCategory(_) => "SPEC_004",
            SpecError::Json(_) => "SPEC_005",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}

/// Errors raised when a clip cannot be turned into an [`AudioBuffer`].
///
/// Fatal for the clip, recoverable at the batch level.
///
/// [`AudioBuffer`]: crate::AudioBuffer
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The decoded buffer holds no samples.
    #[error("audio buffer is empty")]
    Empty,

    /// The file could not be parsed.
    #[error("cannot decode '{}': {message}", path.display())]
    Unreadable {
        /// Source path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The stream uses a format the decoder does not handle.
    #[error("unsupported audio format: {message}")]
    Unsupported {
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Creates an unreadable-file error.
    pub fn unreadable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Unreadable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported-format error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }
}

impl BackendError for DecodeError {
    fn code(&self) -> &'static str {
        match self {
            DecodeError::Empty => "DECODE_001",
            DecodeError::Unreadable { .. } => "DECODE_002",
            DecodeError::Unsupported { .. } => "DECODE_003",
            DecodeError::Io(_) => "DECODE_004",
        }
    }

    fn category(&self) -> &'static str {
        "decode"
    }
}

/// Errors raised by an [`AudioEncoder`](crate::io::AudioEncoder).
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The buffer layout cannot be written by this encoder.
    #[error("unsupported output: {message}")]
    Unsupported {
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError for EncodeError {
    fn code(&self) -> &'static str {
        match self {
            EncodeError::Unsupported { .. } => "ENCODE_001",
            EncodeError::Io(_) => "ENCODE_002",
        }
    }

    fn category(&self) -> &'static str {
        "encode"
    }
}

/// Common trait for backend errors.
///
/// Provides a stable error code (e.g. "MIX_001"), a message and a category
/// so failures from different stages can be reported uniformly.
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    fn category(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_codes_are_stable() {
        assert_eq!(DecodeError::Empty.code(), "DECODE_001");
        assert_eq!(DecodeError::unreadable("a.wav", "bad header").code(), "DECODE_002");
        assert_eq!(DecodeError::Empty.category(), "decode");
    }

    #[test]
    fn test_unreadable_message_contains_path() {
        let err = DecodeError::unreadable("clips/rain.wav", "truncated data chunk");
        let msg = err.message();
        assert!(msg.contains("clips/rain.wav"));
        assert!(msg.contains("truncated data chunk"));
    }

    #[test]
    fn test_invalid_config_helper() {
        let err = SpecError::invalid_config("analysis.hop_length", "must be positive");
        assert!(err.to_string().contains("analysis.hop_length"));
        assert_eq!(err.code(), "SPEC_002");
    }
}
