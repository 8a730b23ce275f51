//! Mix requests and output tags.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::buffer::AudioBuffer;
use crate::category::CategoryMap;
use crate::error::SpecError;

/// Binaural beat parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinauralRequest {
    /// Left-ear carrier in Hz.
    pub base_freq: f64,
    /// Inter-aural difference in Hz.
    pub beat_freq: f64,
}

/// A request to render one mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixRequest {
    pub categories: CategoryMap,
    /// Profile name; unknown names fall back to `sleep`.
    pub mix_type: String,
    pub duration_minutes: f64,
    #[serde(default)]
    pub binaural: Option<BinauralRequest>,
    /// Seed for clip selection.
    #[serde(default)]
    pub seed: u32,
    pub output_path: PathBuf,
}

impl MixRequest {
    /// Creates a request with no binaural layer and seed 0.
    pub fn new(
        categories: CategoryMap,
        mix_type: impl Into<String>,
        duration_minutes: f64,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            categories,
            mix_type: mix_type.into(),
            duration_minutes,
            binaural: None,
            seed: 0,
            output_path: output_path.into(),
        }
    }

    /// Sets the binaural layer.
    pub fn with_binaural(mut self, base_freq: f64, beat_freq: f64) -> Self {
        self.binaural = Some(BinauralRequest {
            base_freq,
            beat_freq,
        });
        self
    }

    /// Sets the selection seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Target length in whole milliseconds.
    pub fn target_duration_ms(&self) -> u64 {
        (self.duration_minutes.max(0.0) * 60_000.0).round() as u64
    }

    /// Target length in frames at `sample_rate`.
    pub fn target_frames(&self, sample_rate: u32) -> usize {
        AudioBuffer::frames_for_ms(self.target_duration_ms(), sample_rate)
    }

    /// Rejects non-finite or non-positive durations.
    pub fn validate(&self) -> Result<(), SpecError> {
        if !self.duration_minutes.is_finite() || self.duration_minutes <= 0.0 {
            return Err(SpecError::invalid_config(
                "duration_minutes",
                format!("must be positive, got {}", self.duration_minutes),
            ));
        }
        Ok(())
    }
}

/// Tags embedded in the exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixTags {
    pub title: String,
    /// `%Y-%m-%d`.
    pub date: String,
    /// The mix type.
    pub genre: String,
}

impl MixTags {
    /// Tags for a mix rendered at `now`.
    pub fn for_mix(mix_type: &str, now: DateTime<Utc>) -> Self {
        Self {
            title: format!("Sleep Sound Mix {}", now.format("%Y%m%d_%H%M%S")),
            date: now.format("%Y-%m-%d").to_string(),
            genre: mix_type.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_target_duration() {
        let req = MixRequest::new(CategoryMap::new(), "sleep", 1.0, "out.wav");
        assert_eq!(req.target_duration_ms(), 60_000);
        assert_eq!(req.target_frames(44_100), 2_646_000);
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let req = MixRequest::new(CategoryMap::new(), "sleep", 0.0, "out.wav");
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_tags_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 22, 15, 7).unwrap();
        let tags = MixTags::for_mix("relax", now);
        assert_eq!(
            tags,
            MixTags {
                title: "Sleep Sound Mix 20240309_221507".to_string(),
                date: "2024-03-09".to_string(),
                genre: "relax".to_string(),
            }
        );
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "categories": {"rain": ["a.wav", "b.wav"]},
            "mix_type": "focus",
            "duration_minutes": 30,
            "binaural": {"base_freq": 200.0, "beat_freq": 10.0},
            "output_path": "mix.wav"
        }"#;
        let req: MixRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.seed, 0);
        assert_eq!(req.binaural.unwrap().beat_freq, 10.0);
        assert_eq!(req.target_duration_ms(), 1_800_000);
    }
}
