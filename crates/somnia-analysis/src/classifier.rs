//! Rule-based clip classification.
//!
//! Each rule adds points to one category; the single highest-scoring category
//! wins. A tie at the top or an all-zero score yields `other`.

use std::collections::BTreeMap;

use somnia_spec::{CategoryLabel, ClassifierThresholds, FeatureVector};

/// Points per category.
pub type CategoryScores = BTreeMap<CategoryLabel, u32>;

/// Deterministic point-scoring classifier.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: ClassifierThresholds,
}

impl Classifier {
    /// Creates a classifier with the given thresholds.
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    /// Scores every category except `other`.
    pub fn scores(&self, fv: &FeatureVector) -> CategoryScores {
        let t = &self.thresholds;
        let mut scores: CategoryScores = [
            CategoryLabel::Rain,
            CategoryLabel::Thunder,
            CategoryLabel::WhiteNoise,
            CategoryLabel::Nature,
            CategoryLabel::Water,
        ]
        .into_iter()
        .map(|label| (label, 0))
        .collect();

        let mut award = |label: CategoryLabel, condition: bool, points: u32| {
            if condition {
                *scores.entry(label).or_default() += points;
            }
        };

        let centroid = fv.spectral_centroid;

        award(CategoryLabel::Rain, centroid < t.rain_centroid_max, t.rain_centroid_points);
        let repetitive = fv.repetitiveness_score > t.repetitive_min;
        award(CategoryLabel::Rain, repetitive, t.repetitive_points);
        award(CategoryLabel::WhiteNoise, repetitive, t.repetitive_points);
        award(
            CategoryLabel::Rain,
            fv.cadence_regularity > t.rain_cadence_min,
            t.rain_cadence_points,
        );

        award(
            CategoryLabel::Thunder,
            t.thunder_centroid_min < centroid && centroid < t.thunder_centroid_max,
            t.thunder_centroid_points,
        );
        award(
            CategoryLabel::Thunder,
            fv.loudness > t.thunder_loudness_min,
            t.thunder_loudness_points,
        );

        award(
            CategoryLabel::WhiteNoise,
            fv.zero_crossing_rate > t.white_noise_zcr_min,
            t.white_noise_zcr_points,
        );
        award(
            CategoryLabel::WhiteNoise,
            fv.spectral_flatness > t.white_noise_flatness_min,
            t.white_noise_flatness_points,
        );

        award(
            CategoryLabel::Nature,
            fv.naturalness_score > t.nature_naturalness_min,
            t.nature_naturalness_points,
        );
        award(
            CategoryLabel::Nature,
            centroid > t.nature_centroid_min,
            t.nature_centroid_points,
        );

        award(
            CategoryLabel::Water,
            centroid < t.water_centroid_max && fv.naturalness_score > t.water_naturalness_min,
            t.water_points,
        );

        scores
    }

    /// Returns the single top-scoring category, or `other`.
    pub fn classify(&self, fv: &FeatureVector) -> CategoryLabel {
        pick_winner(&self.scores(fv))
    }
}

/// Top category when it is unique and non-zero, else `other`.
pub fn pick_winner(scores: &CategoryScores) -> CategoryLabel {
    let max = scores.values().copied().max().unwrap_or(0);
    if max == 0 {
        return CategoryLabel::Other;
    }
    let mut leaders = scores.iter().filter(|(_, &s)| s == max).map(|(l, _)| *l);
    match (leaders.next(), leaders.next()) {
        (Some(label), None) => label,
        _ => CategoryLabel::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classifier() -> Classifier {
        Classifier::default()
    }

    #[test]
    fn test_zero_vector_scores() {
        // A centroid of 0 still satisfies the rain centroid rule.
        let scores = classifier().scores(&FeatureVector::default());
        assert_eq!(scores[&CategoryLabel::Rain], 2);
        assert_eq!(scores[&CategoryLabel::Water], 0);
        assert_eq!(classifier().classify(&FeatureVector::default()), CategoryLabel::Rain);
    }

    #[test]
    fn test_rain_profile() {
        let fv = FeatureVector {
            spectral_centroid: 1500.0,
            repetitiveness_score: 0.8,
            cadence_regularity: 0.7,
            ..Default::default()
        };
        let scores = classifier().scores(&fv);
        assert_eq!(scores[&CategoryLabel::Rain], 5);
        assert_eq!(scores[&CategoryLabel::WhiteNoise], 1);
        assert_eq!(scores[&CategoryLabel::Thunder], 1);
        assert_eq!(classifier().classify(&fv), CategoryLabel::Rain);
    }

    #[test]
    fn test_white_noise_profile() {
        let fv = FeatureVector {
            spectral_centroid: 5500.0,
            zero_crossing_rate: 0.5,
            spectral_flatness: 0.56,
            ..Default::default()
        };
        assert_eq!(classifier().scores(&fv)[&CategoryLabel::WhiteNoise], 5);
        assert_eq!(classifier().classify(&fv), CategoryLabel::WhiteNoise);
    }

    #[test]
    fn test_nature_profile() {
        let fv = FeatureVector {
            spectral_centroid: 3500.0,
            naturalness_score: 0.7,
            ..Default::default()
        };
        assert_eq!(classifier().classify(&fv), CategoryLabel::Nature);
    }

    #[test]
    fn test_tie_yields_other() {
        // Thunder: centroid in range +1, loudness +2. Rain: repetitive +1, cadence +2.
        let fv = FeatureVector {
            spectral_centroid: 2500.0,
            loudness: 0.2,
            repetitiveness_score: 0.9,
            cadence_regularity: 0.9,
            ..Default::default()
        };
        let scores = classifier().scores(&fv);
        assert_eq!(scores[&CategoryLabel::Rain], 3);
        assert_eq!(scores[&CategoryLabel::Thunder], 3);
        assert_eq!(classifier().classify(&fv), CategoryLabel::Other);
    }

    #[test]
    fn test_all_zero_scores_yield_other() {
        let scores: CategoryScores = CategoryLabel::ALL.into_iter().map(|l| (l, 0)).collect();
        assert_eq!(pick_winner(&scores), CategoryLabel::Other);
        assert_eq!(pick_winner(&CategoryScores::new()), CategoryLabel::Other);
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let fv = FeatureVector {
            spectral_centroid: 1900.0,
            ..Default::default()
        };
        let strict = Classifier::new(ClassifierThresholds {
            rain_centroid_max: 1800.0,
            ..Default::default()
        });
        // Rain loses its centroid points; thunder's centroid rule wins alone.
        assert_eq!(strict.classify(&fv), CategoryLabel::Thunder);
        assert_eq!(classifier().classify(&fv), CategoryLabel::Rain);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let fv = FeatureVector {
            spectral_centroid: 2200.0,
            naturalness_score: 0.55,
            loudness: 0.05,
            ..Default::default()
        };
        let c = classifier();
        assert_eq!(c.classify(&fv), c.classify(&fv));
    }
}
