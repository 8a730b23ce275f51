//! Purpose-driven clip ranking.
//!
//! Scores are recomputed on demand from a clip's analysis record and are
//! never stored with it.

use std::cmp::Ordering;
use std::path::PathBuf;

use somnia_spec::{
    CategoryLabel, CategoryMap, ClipAnalysis, ClipRecord, Purpose, SelectionPolicy, SleepPhase,
};

/// The analysis fields a suitability score reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuitabilityInputs {
    pub sleep_induction_potential: f64,
    pub relaxation_factor: f64,
    pub focus_enhancement_score: f64,
    pub arousal: f64,
    pub valence: f64,
    pub ambient_score: f64,
    pub masking_potential: f64,
}

impl From<&ClipAnalysis> for SuitabilityInputs {
    fn from(a: &ClipAnalysis) -> Self {
        Self {
            sleep_induction_potential: a.metrics.sleep_induction_potential,
            relaxation_factor: a.metrics.relaxation_factor,
            focus_enhancement_score: a.metrics.focus_enhancement_score,
            arousal: a.mood.arousal,
            valence: a.mood.valence,
            ambient_score: a.metrics.ambient_score,
            masking_potential: a.metrics.masking_potential,
        }
    }
}

/// A clip chosen for a purpose.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredClip {
    pub path: PathBuf,
    pub category: CategoryLabel,
    pub score: f64,
}

/// Ranks analyzed clips for a purpose.
#[derive(Debug, Clone, Default)]
pub struct SuitabilityScorer {
    policy: SelectionPolicy,
}

impl SuitabilityScorer {
    /// Creates a scorer with a selection policy.
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    /// Scores one clip for a purpose, in [0, 1].
    pub fn score(inputs: &SuitabilityInputs, purpose: Purpose) -> f64 {
        let calm = 1.0 - inputs.arousal;
        let raw = match purpose {
            Purpose::Sleep { phase } => {
                let phase_component = match phase {
                    SleepPhase::FallingAsleep => {
                        0.4 * inputs.relaxation_factor + 0.4 * calm + 0.2 * inputs.ambient_score
                    }
                    SleepPhase::DeepSleep => {
                        0.5 * calm + 0.3 * inputs.ambient_score + 0.2 * inputs.masking_potential
                    }
                    SleepPhase::Rem => {
                        0.3 * inputs.relaxation_factor + 0.4 * inputs.ambient_score + 0.3 * calm
                    }
                };
                0.6 * inputs.sleep_induction_potential + 0.4 * phase_component
            }
            Purpose::Focus => {
                0.5 * inputs.focus_enhancement_score
                    + 0.3 * calm
                    + 0.2 * (1.0 - (inputs.valence - 0.5).abs())
            }
            Purpose::Relax => {
                0.5 * inputs.relaxation_factor + 0.3 * calm + 0.2 * inputs.valence
            }
        };
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 1.0)
        }
    }

    /// Ranks clips, best first.
    ///
    /// Clips without an analysis are skipped. Clips scoring at or below the
    /// policy minimum are dropped, and at most `top_n` are kept.
    pub fn select(&self, records: &[ClipRecord], purpose: Purpose) -> Vec<ScoredClip> {
        let mut scored: Vec<ScoredClip> = records
            .iter()
            .filter_map(|record| {
                let analysis = record.analysis.as_ref()?;
                let score = Self::score(&SuitabilityInputs::from(analysis), purpose);
                Some(ScoredClip {
                    path: record.path.clone(),
                    category: analysis.category,
                    score,
                })
            })
            .filter(|clip| clip.score > self.policy.min_score)
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.path.cmp(&b.path))
        });
        scored.truncate(self.policy.top_n);

        tracing::debug!(
            purpose = %purpose,
            candidates = records.len(),
            selected = scored.len(),
            "ranked clips"
        );
        scored
    }

    /// Selects clips and groups them by category, ready for a mix request.
    pub fn select_category_map(&self, records: &[ClipRecord], purpose: Purpose) -> CategoryMap {
        let mut map = CategoryMap::new();
        for clip in self.select(records, purpose) {
            map.entry(clip.category).or_default().push(clip.path);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use somnia_spec::{FeatureVector, Mood, TherapeuticMetrics, ANALYSIS_VERSION};

    fn inputs(arousal: f64) -> SuitabilityInputs {
        SuitabilityInputs {
            sleep_induction_potential: 0.6,
            relaxation_factor: 0.5,
            focus_enhancement_score: 0.5,
            arousal,
            valence: 0.5,
            ambient_score: 0.7,
            masking_potential: 0.4,
        }
    }

    fn record(name: &str, category: CategoryLabel, sip: f64) -> ClipRecord {
        ClipRecord {
            path: PathBuf::from(name),
            analysis: Some(ClipAnalysis {
                path: PathBuf::from(name),
                content_hash: String::new(),
                sample_rate: 44_100,
                channels: 1,
                category,
                features: FeatureVector::default(),
                metrics: TherapeuticMetrics {
                    sleep_induction_potential: sip,
                    relaxation_factor: sip,
                    ambient_score: sip,
                    ..Default::default()
                },
                mood: Mood::NEUTRAL,
                embedding: None,
                analyzed_at: Utc::now(),
                analysis_version: ANALYSIS_VERSION.to_string(),
            }),
        }
    }

    const FALLING_ASLEEP: Purpose = Purpose::Sleep {
        phase: SleepPhase::FallingAsleep,
    };

    #[test]
    fn test_falling_asleep_formula() {
        // 0.6 * 0.6 + 0.4 * (0.4 * 0.5 + 0.4 * 0.8 + 0.2 * 0.7)
        let expected = 0.36 + 0.4 * (0.2 + 0.32 + 0.14);
        let score = SuitabilityScorer::score(&inputs(0.2), FALLING_ASLEEP);
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_focus_and_relax_formulas() {
        let i = inputs(0.5);
        let focus = SuitabilityScorer::score(&i, Purpose::Focus);
        assert!((focus - (0.25 + 0.15 + 0.2)).abs() < 1e-12);
        let relax = SuitabilityScorer::score(&i, Purpose::Relax);
        assert!((relax - (0.25 + 0.15 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_score_is_clamped() {
        let extreme = SuitabilityInputs {
            sleep_induction_potential: 5.0,
            arousal: -3.0,
            ..inputs(0.0)
        };
        assert_eq!(SuitabilityScorer::score(&extreme, Purpose::Relax), 1.0);
        let nan = SuitabilityInputs {
            arousal: f64::NAN,
            ..inputs(0.0)
        };
        assert_eq!(SuitabilityScorer::score(&nan, FALLING_ASLEEP), 0.0);
    }

    #[test]
    fn test_falling_asleep_decreases_with_arousal() {
        let low = SuitabilityScorer::score(&inputs(0.1), FALLING_ASLEEP);
        let high = SuitabilityScorer::score(&inputs(0.9), FALLING_ASLEEP);
        assert!(low > high);
    }

    #[test]
    fn test_select_skips_missing_and_low_scores() {
        let mut records = vec![
            record("a.wav", CategoryLabel::Rain, 0.9),
            record("b.wav", CategoryLabel::Water, 0.0),
            ClipRecord {
                path: PathBuf::from("c.wav"),
                analysis: None,
            },
            record("d.wav", CategoryLabel::Rain, 0.7),
        ];
        // b: 0.6 * 0 + 0.4 * (0.4 * 0 + 0.4 * 0.5 + 0) = 0.08, below threshold
        let selected = SuitabilityScorer::default().select(&records, FALLING_ASLEEP);
        let names: Vec<_> = selected.iter().map(|c| c.path.to_str().unwrap()).collect();
        assert_eq!(names, vec!["a.wav", "d.wav"]);

        records.truncate(1);
        let map = SuitabilityScorer::default().select_category_map(&records, FALLING_ASLEEP);
        assert_eq!(map[&CategoryLabel::Rain], vec![PathBuf::from("a.wav")]);
    }

    #[test]
    fn test_select_caps_at_top_n() {
        let records: Vec<_> = (0..12)
            .map(|i| record(&format!("clip_{i:02}.wav"), CategoryLabel::Nature, 0.5 + i as f64 * 0.04))
            .collect();
        let selected = SuitabilityScorer::default().select(&records, FALLING_ASLEEP);
        assert_eq!(selected.len(), 8);
        assert_eq!(selected[0].path, PathBuf::from("clip_11.wav"));
        assert!(selected.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
