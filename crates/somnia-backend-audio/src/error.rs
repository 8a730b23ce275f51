//! Error types for the mix backend.

use std::path::PathBuf;

use somnia_spec::{BackendError, CategoryLabel, DecodeError, EncodeError, SpecError};
use thiserror::Error;

/// Result type for mix operations.
pub type MixResult<T> = Result<T, MixError>;

/// Errors that can occur while building or exporting a mix.
///
/// Only [`MixError::Export`] is fatal to a mix; the mix pipeline recovers
/// from every other variant.
#[derive(Debug, Error)]
pub enum MixError {
    /// A requested category has no usable source clips.
    #[error("category '{category}' has no source clips")]
    EmptyCategory {
        /// The empty category.
        category: CategoryLabel,
    },

    /// No profile is registered for the requested mix type.
    #[error("no mix profile registered for '{name}'")]
    InvalidProfile {
        /// The requested mix type.
        name: String,
    },

    /// A synthesis parameter is out of range.
    #[error("invalid synthesis parameter '{name}': {message}")]
    SynthesisParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Invalid processing parameter.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// A source clip could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Writing the finished mix failed.
    #[error("export to '{}' failed: {source}", path.display())]
    Export {
        /// Output path.
        path: PathBuf,
        /// Encoder error.
        source: EncodeError,
    },

    /// Invalid configuration or request.
    #[error("configuration error: {0}")]
    Config(#[from] SpecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MixError {
    /// Creates a synthesis parameter error.
    pub fn synthesis_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SynthesisParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl BackendError for MixError {
    fn code(&self) -> &'static str {
        match self {
            MixError::EmptyCategory { .. } => "MIX_001",
            MixError::InvalidProfile { .. } => "MIX_002",
            MixError::SynthesisParameter { .. } => "MIX_003",
            MixError::InvalidParameter { .. } => "MIX_004",
            MixError::Decode(_) => "MIX_005",
            MixError::Export { .. } => "MIX_006",
            MixError::Config(_) => "MIX_007",
            MixError::Io(_) => "MIX_008",
        }
    }

    fn category(&self) -> &'static str {
        "mix"
    }
}
