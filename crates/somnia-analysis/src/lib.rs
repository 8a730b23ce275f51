//! Somnia clip analysis.
//!
//! This crate turns decoded clips into feature vectors, category labels and
//! purpose scores:
//!
//! - [`FeatureExtractor`] - spectral centroid, bandwidth, rolloff, flatness,
//!   zero-crossing rate, loudness and tempo
//! - [`PsychoacousticAnalyzer`] - seven perceptual band energies, roughness,
//!   tonalness and the relaxation score
//! - [`TemporalPatternAnalyzer`] - tempo consistency, repetitiveness, cadence
//!   regularity, evenness and naturalness
//! - [`Classifier`] - deterministic point scoring into a [`CategoryLabel`]
//! - [`SuitabilityScorer`] - ranks analyzed clips for a sleep phase, focus or
//!   relaxation
//!
//! [`ClipAnalyzer`] runs all of the above for one clip; [`analyze_clips`] runs
//! it over many clips on the rayon pool.
//!
//! # Example
//!
//! ```
//! use somnia_analysis::ClipAnalyzer;
//! use somnia_spec::AudioBuffer;
//!
//! let samples = (0..22_050).map(|i| (i as f64 * 0.05).sin() * 0.2).collect();
//! let buffer = AudioBuffer::mono(samples, 22_050);
//!
//! let analyzer = ClipAnalyzer::default();
//! let label = analyzer.classify(&buffer).unwrap();
//! println!("classified as {label}");
//! ```
//!
//! [`CategoryLabel`]: somnia_spec::CategoryLabel

pub mod batch;
pub mod classifier;
pub mod frames;
pub mod mfcc;
pub mod onset;
pub mod pipeline;
pub mod psychoacoustic;
pub mod sleep;
pub mod spectral;
pub mod stft;
pub mod suitability;
pub mod temporal;

pub use batch::{
    analyze_clips, analyze_clips_cancellable, analyze_clips_detailed, scan_audio_folder,
    AnalyzedClip, BatchOutcome,
};
pub use classifier::{CategoryScores, Classifier};
pub use frames::ClipFrames;
pub use pipeline::{ClipAnalyzer, ClipFeatures, EmbeddingModel, MoodModel};
pub use psychoacoustic::PsychoacousticAnalyzer;
pub use spectral::FeatureExtractor;
pub use suitability::{ScoredClip, SuitabilityInputs, SuitabilityScorer};
pub use temporal::TemporalPatternAnalyzer;
