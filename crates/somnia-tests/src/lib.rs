//! Somnia End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the analysis and mix flows:
//!
//! - Analysis: folder of clips -> category map and analysis records
//! - Mixing: category map -> rendered, mastered, exported mix
//! - **Invariants**: property tests over lengths, levels and scores
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p somnia-tests
//! ```
//!
//! Fixtures are synthesized on the fly; no audio files are checked in.

pub mod fixtures;
pub mod spectrum;

pub use fixtures::{init_tracing, ClipFolderFixture};
pub use spectrum::{bin_resolution, dominant_frequency};
