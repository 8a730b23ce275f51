//! Single-clip analysis pipeline.
//!
//! [`ClipAnalyzer`] runs the three analyzers over shared frames, classifies
//! the result and derives the therapeutic metrics. Mood and embedding models
//! are optional injected capabilities; without them the record carries a
//! neutral mood and no embedding.

use std::path::Path;

use chrono::Utc;
use somnia_spec::hash::file_content_hash;
use somnia_spec::{
    AnalysisConfig, AudioBuffer, AudioDecoder, CategoryLabel, ClipAnalysis, DecodeError, EngineConfig,
    FeatureVector, Mood, SpecError, ANALYSIS_VERSION,
};

use crate::classifier::Classifier;
use crate::frames::ClipFrames;
use crate::psychoacoustic::PsychoacousticAnalyzer;
use crate::sleep::therapeutic_metrics;
use crate::spectral::FeatureExtractor;
use crate::temporal::TemporalPatternAnalyzer;

/// Predicts valence, arousal and dominance for a clip.
pub trait MoodModel: Send + Sync {
    /// Returns `None` when the model cannot score this clip.
    fn predict(&self, buffer: &AudioBuffer) -> Option<Mood>;
}

/// Produces an opaque similarity embedding for a clip.
pub trait EmbeddingModel: Send + Sync {
    /// Returns `None` when the model cannot embed this clip.
    fn embed(&self, buffer: &AudioBuffer) -> Option<Vec<f32>>;
}

/// Features plus the frames they were computed from.
#[derive(Debug, Clone)]
pub struct ClipFeatures {
    pub features: FeatureVector,
    pub frames: ClipFrames,
}

/// Analyzes and classifies individual clips.
pub struct ClipAnalyzer {
    extractor: FeatureExtractor,
    psychoacoustic: PsychoacousticAnalyzer,
    temporal: TemporalPatternAnalyzer,
    classifier: Classifier,
    analysis: AnalysisConfig,
    mood_model: Option<Box<dyn MoodModel>>,
    embedding_model: Option<Box<dyn EmbeddingModel>>,
}

impl ClipAnalyzer {
    /// Creates an analyzer from the engine configuration.
    ///
    /// # Errors
    /// Returns [`SpecError::InvalidConfig`] when a value is out of range.
    pub fn new(config: &EngineConfig) -> Result<Self, SpecError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: &EngineConfig) -> Self {
        Self {
            extractor: FeatureExtractor::new(config.analysis.clone()),
            psychoacoustic: PsychoacousticAnalyzer::new(config.analysis.clone()),
            temporal: TemporalPatternAnalyzer::new(config.analysis.clone()),
            classifier: Classifier::new(config.classifier.clone()),
            analysis: config.analysis.clone(),
            mood_model: None,
            embedding_model: None,
        }
    }

    /// Attaches a mood model.
    pub fn with_mood_model(mut self, model: Box<dyn MoodModel>) -> Self {
        self.mood_model = Some(model);
        self
    }

    /// Attaches an embedding model.
    pub fn with_embedding_model(mut self, model: Box<dyn EmbeddingModel>) -> Self {
        self.embedding_model = Some(model);
        self
    }

    /// The classifier in use.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Computes the full feature vector for a buffer.
    pub fn features(&self, buffer: &AudioBuffer) -> Result<ClipFeatures, DecodeError> {
        let frames = ClipFrames::compute(buffer, &self.analysis)?;
        let features = FeatureVector::combine(
            self.extractor.extract_frames(&frames),
            self.psychoacoustic.analyze_frames(&frames),
            self.temporal.analyze_frames(&frames),
        );
        Ok(ClipFeatures { features, frames })
    }

    /// Feature vector, or zeros when the buffer cannot be analyzed.
    pub fn features_or_zero(&self, buffer: &AudioBuffer) -> FeatureVector {
        self.features(buffer)
            .map(|f| f.features)
            .unwrap_or_default()
    }

    /// Classifies a decoded buffer.
    pub fn classify(&self, buffer: &AudioBuffer) -> Result<CategoryLabel, DecodeError> {
        let clip = self.features(buffer)?;
        Ok(self.classifier.classify(&clip.features))
    }

    /// Builds the full analysis record for a decoded buffer.
    pub fn analyze_buffer(
        &self,
        path: &Path,
        content_hash: String,
        buffer: &AudioBuffer,
    ) -> Result<ClipAnalysis, DecodeError> {
        let ClipFeatures { features, frames } = self.features(buffer)?;
        let category = self.classifier.classify(&features);
        let metrics = therapeutic_metrics(&features, &frames);
        let mood = self
            .mood_model
            .as_ref()
            .and_then(|m| m.predict(buffer))
            .unwrap_or_default();
        let embedding = self.embedding_model.as_ref().and_then(|m| m.embed(buffer));

        tracing::debug!(
            path = %path.display(),
            category = %category,
            centroid = features.spectral_centroid,
            "analyzed clip"
        );

        Ok(ClipAnalysis {
            path: path.to_path_buf(),
            content_hash,
            sample_rate: buffer.sample_rate(),
            channels: buffer.num_channels(),
            category,
            features,
            metrics,
            mood,
            embedding,
            analyzed_at: Utc::now(),
            analysis_version: ANALYSIS_VERSION.to_string(),
        })
    }

    /// Decodes and analyzes a file.
    pub fn analyze_file(
        &self,
        path: &Path,
        decoder: &dyn AudioDecoder,
    ) -> Result<ClipAnalysis, DecodeError> {
        let content_hash = file_content_hash(path)?;
        let buffer = decoder.decode(path)?;
        self.analyze_buffer(path, content_hash, &buffer)
    }
}

impl Default for ClipAnalyzer {
    fn default() -> Self {
        Self::from_valid(&EngineConfig::default())
    }
}

impl std::fmt::Debug for ClipAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipAnalyzer")
            .field("analysis", &self.analysis)
            .field("mood_model", &self.mood_model.is_some())
            .field("embedding_model", &self.embedding_model.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct CalmModel;

    impl MoodModel for CalmModel {
        fn predict(&self, _buffer: &AudioBuffer) -> Option<Mood> {
            Some(Mood {
                valence: 0.8,
                arousal: 0.1,
                dominance: 0.3,
            })
        }
    }

    struct FixedEmbedding;

    impl EmbeddingModel for FixedEmbedding {
        fn embed(&self, _buffer: &AudioBuffer) -> Option<Vec<f32>> {
            Some(vec![0.25; 4])
        }
    }

    fn tone() -> AudioBuffer {
        let sr = 22_050;
        let samples = (0..sr)
            .map(|i| 0.3 * (2.0 * std::f64::consts::PI * 220.0 * i as f64 / sr as f64).sin())
            .collect();
        AudioBuffer::mono(samples, sr as u32)
    }

    #[test]
    fn test_record_without_models_is_neutral() {
        let analyzer = ClipAnalyzer::default();
        let record = analyzer
            .analyze_buffer(Path::new("tone.wav"), "h".to_string(), &tone())
            .unwrap();
        assert_eq!(record.mood, Mood::NEUTRAL);
        assert_eq!(record.embedding, None);
        assert_eq!(record.analysis_version, ANALYSIS_VERSION);
        assert!((record.features.duration - 1.0).abs() < 1e-9);
        assert_eq!(record.category, analyzer.classifier().classify(&record.features));
    }

    #[test]
    fn test_injected_models_are_used() {
        let analyzer = ClipAnalyzer::default()
            .with_mood_model(Box::new(CalmModel))
            .with_embedding_model(Box::new(FixedEmbedding));
        let record = analyzer
            .analyze_buffer(Path::new("tone.wav"), "h".to_string(), &tone())
            .unwrap();
        assert_eq!(record.mood.arousal, 0.1);
        assert_eq!(record.embedding, Some(vec![0.25; 4]));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.analysis.hop_length = 0;
        let err = ClipAnalyzer::new(&config).unwrap_err();
        assert!(matches!(err, SpecError::InvalidConfig { .. }));
        assert!(ClipAnalyzer::new(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_buffer_features_default_to_zero() {
        let analyzer = ClipAnalyzer::default();
        let empty = AudioBuffer::mono(Vec::new(), 44_100);
        assert!(analyzer.features(&empty).is_err());
        assert!(analyzer.features_or_zero(&empty).is_zero());
    }
}
