//! Flat per-clip analysis record.
//!
//! A [`ClipAnalysis`] is everything the suitability scorer and downstream
//! tools know about one clip. It serializes to a single flat JSON object so it
//! can be stored as a cache entry keyed by [`ClipAnalysis::content_hash`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::CategoryLabel;
use crate::error::SpecError;
use crate::feature::FeatureVector;

/// Version tag written into every record.
pub const ANALYSIS_VERSION: &str = "somnia-analysis/1";

/// Valence/arousal/dominance triple, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    pub valence: f64,
    pub arousal: f64,
    pub dominance: f64,
}

impl Mood {
    /// Mood reported when no mood model is available.
    pub const NEUTRAL: Mood = Mood {
        valence: 0.5,
        arousal: 0.5,
        dominance: 0.5,
    };
}

impl Default for Mood {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Purpose-oriented scores derived from a [`FeatureVector`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TherapeuticMetrics {
    pub sleep_induction_potential: f64,
    pub focus_enhancement_score: f64,
    pub relaxation_factor: f64,
    pub ambient_score: f64,
    pub masking_potential: f64,
    pub loop_seamlessness: f64,
    pub dynamic_range_db: f64,
    pub lufs_estimate: f64,
}

/// Everything known about one analyzed clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipAnalysis {
    pub path: PathBuf,
    /// Hex BLAKE3 of the file contents.
    pub content_hash: String,
    pub sample_rate: u32,
    pub channels: usize,
    pub category: CategoryLabel,
    #[serde(flatten)]
    pub features: FeatureVector,
    #[serde(flatten)]
    pub metrics: TherapeuticMetrics,
    #[serde(flatten)]
    pub mood: Mood,
    /// Opaque similarity embedding from an external model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub analyzed_at: DateTime<Utc>,
    pub analysis_version: String,
}

impl ClipAnalysis {
    /// Serializes to JSON.
    pub fn to_json(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A clip path with whatever is known about it.
///
/// Input to intelligent selection; clips without an analysis are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub path: PathBuf,
    #[serde(default)]
    pub analysis: Option<ClipAnalysis>,
}
