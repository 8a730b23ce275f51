//! Somnia data model.
//!
//! This crate defines the values that flow through the Somnia engine: decoded
//! audio buffers, per-clip feature vectors, category labels, mix profiles,
//! analysis records, mix requests and the engine configuration. It has no
//! signal processing of its own.
//!
//! # Example
//!
//! ```
//! use somnia_spec::{CategoryLabel, CategoryMap, MixRequest, ProfileRegistry};
//! use std::path::PathBuf;
//!
//! let mut categories = CategoryMap::new();
//! categories.insert(CategoryLabel::Rain, vec![PathBuf::from("clips/rain.wav")]);
//!
//! let request = MixRequest::new(categories, "sleep", 1.0, "out/mix.wav").with_seed(7);
//! assert_eq!(request.target_duration_ms(), 60_000);
//!
//! let registry = ProfileRegistry::builtin();
//! let profile = registry.resolve_or_default(&request.mix_type);
//! assert_eq!(profile.crossfade_ms, 5_000);
//! ```
//!
//! # Modules
//!
//! - [`buffer`]: planar in-memory audio
//! - [`feature`]: fixed-field feature vector and its partial parts
//! - [`category`]: category labels and the category → paths map
//! - [`profile`]: mix profiles and the profile registry
//! - [`purpose`]: sleep phases and mix purposes
//! - [`analysis`]: flat per-clip analysis record
//! - [`config`]: engine configuration
//! - [`request`]: mix requests and export tags
//! - [`io`]: decoder/encoder traits
//! - [`hash`]: content hashing
//! - [`error`]: error types and the [`BackendError`] trait

pub mod analysis;
pub mod buffer;
pub mod category;
pub mod config;
pub mod error;
pub mod feature;
pub mod hash;
pub mod io;
pub mod profile;
pub mod purpose;
pub mod request;

// Re-export commonly used types at the crate root
pub use analysis::{ClipAnalysis, ClipRecord, Mood, TherapeuticMetrics, ANALYSIS_VERSION};
pub use buffer::AudioBuffer;
pub use category::{total_clips, CategoryLabel, CategoryMap};
pub use config::{
    AnalysisConfig, BinauralSettings, ClassifierThresholds, EngineConfig, MasterSettings,
    PeakPickConfig, SelectionPolicy,
};
pub use error::{BackendError, DecodeError, EncodeError, SpecError};
pub use feature::{
    BandEnergies, FeatureVector, PsychoacousticFeatures, SpectralFeatures, TemporalFeatures,
};
pub use io::{AudioDecoder, AudioEncoder};
pub use profile::{FrequencyShaping, MixProfile, MixType, ProfileRegistry};
pub use purpose::{Purpose, SleepPhase};
pub use request::{BinauralRequest, MixRequest, MixTags};
