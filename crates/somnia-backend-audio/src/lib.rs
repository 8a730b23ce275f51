//! Somnia Audio Backend
//!
//! This crate builds therapeutic ambient mixes from categorized clips and
//! handles WAV input and output.
//!
//! # Overview
//!
//! A mix is rendered in four stages:
//!
//! - **Category beds** - [`CategoryMixer`] loops randomly chosen clips of one
//!   category with crossfades up to the target length
//! - **Layering** - [`LayerCompositor`] sums the beds with per-category gain
//! - **Mastering** - [`MasterProcessor`] fades, filters, compresses and
//!   normalizes the master
//! - **Binaural beats** - [`BinauralBeatSynthesizer`] optionally adds a
//!   dual-tone layer on top
//!
//! # Determinism
//!
//! Clip selection draws from PCG32 streams seeded per category via BLAKE3, so
//! the same request and seed always render the same PCM.
//!
//! # Example
//!
//! ```no_run
//! use somnia_backend_audio::{MixCreator, WavDecoder, WavEncoder};
//! use somnia_spec::{CategoryLabel, CategoryMap, EngineConfig, MixRequest};
//!
//! let config = EngineConfig::default();
//! let creator = MixCreator::new(config.clone())?;
//!
//! let mut categories = CategoryMap::new();
//! categories.insert(CategoryLabel::Rain, vec!["clips/rain.wav".into()]);
//! let request = MixRequest::new(categories, "sleep", 60.0, "out/sleep.wav").with_seed(42);
//!
//! let decoder = WavDecoder::new(config.sample_rate, config.channels);
//! let outcome = creator.create_mix(&request, &decoder, &WavEncoder::new())?;
//! println!("{} ({})", outcome.path.display(), outcome.pcm_hash);
//! # Ok::<(), somnia_backend_audio::MixError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`mix`] - End-to-end rendering and export
//! - [`mixer`] - Category beds and layer compositing
//! - [`master`] - Master bus chain
//! - [`binaural`] - Binaural beat synthesis
//! - [`effects`] - Fades and compression
//! - [`filter`] - Biquad filters
//! - [`processing`] - Normalization, limiting and silence trimming
//! - [`resample`] - Sample rate conversion
//! - [`rng`] - Deterministic RNG with seed derivation
//! - [`wav`] - WAV decoding and tagged export

pub mod binaural;
pub mod effects;
pub mod error;
pub mod filter;
pub mod master;
pub mod mix;
pub mod mixer;
pub mod processing;
pub mod resample;
pub mod rng;
pub mod wav;

// Re-export main types at crate root
pub use binaural::{overlay_binaural, BinauralBeatSynthesizer, BinauralParams};
pub use error::{MixError, MixResult};
pub use master::MasterProcessor;
pub use mix::{save_preview, MixCreator, MixOutcome, DEFAULT_PREVIEW_SECS};
pub use mixer::{CategoryMixer, FrozenMaster, LayerCompositor, MasterBuffer};
pub use wav::{WavDecoder, WavEncoder};
