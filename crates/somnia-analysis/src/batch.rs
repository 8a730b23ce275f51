//! Folder scanning and parallel batch analysis.
//!
//! Clips are analyzed independently on the rayon pool. A clip that fails to
//! decode or analyze is logged and filed under `other`; it never aborts the
//! batch. Each call returns a fresh category map.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use somnia_spec::{
    AudioDecoder, CategoryLabel, CategoryMap, ClipAnalysis, ClipRecord, FeatureVector,
};
use walkdir::WalkDir;

use crate::pipeline::ClipAnalyzer;

/// File extensions picked up by [`scan_audio_folder`].
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a"];

/// Outcome for one clip in a batch.
#[derive(Debug, Clone)]
pub struct AnalyzedClip {
    pub path: PathBuf,
    pub category: CategoryLabel,
    /// Zeros when analysis failed.
    pub features: FeatureVector,
    pub analysis: Option<ClipAnalysis>,
}

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Clips that were attempted, in input order.
    pub clips: Vec<AnalyzedClip>,
    /// Clips not attempted because the batch was cancelled.
    pub skipped: Vec<PathBuf>,
}

impl BatchOutcome {
    /// Groups attempted clips by category.
    pub fn category_map(&self) -> CategoryMap {
        let mut map = CategoryMap::new();
        for clip in &self.clips {
            map.entry(clip.category).or_default().push(clip.path.clone());
        }
        map
    }

    /// Records for intelligent selection.
    pub fn records(&self) -> Vec<ClipRecord> {
        self.clips
            .iter()
            .map(|c| ClipRecord {
                path: c.path.clone(),
                analysis: c.analysis.clone(),
            })
            .collect()
    }

    /// Paths whose analysis failed.
    pub fn failed(&self) -> impl Iterator<Item = &Path> {
        self.clips
            .iter()
            .filter(|c| c.analysis.is_none())
            .map(|c| c.path.as_path())
    }
}

/// Recursively lists audio files under `root`, sorted.
pub fn scan_audio_folder(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && has_audio_extension(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
            }
        }
    }
    files.sort();
    tracing::debug!(root = %root.display(), files = files.len(), "scanned folder");
    files
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| AUDIO_EXTENSIONS.contains(&e.as_str()))
}

/// Analyzes clips in parallel and returns a category → paths map.
pub fn analyze_clips(
    analyzer: &ClipAnalyzer,
    paths: &[PathBuf],
    decoder: &dyn AudioDecoder,
) -> CategoryMap {
    analyze_clips_detailed(analyzer, paths, decoder, None).category_map()
}

/// Analyzes clips in parallel, stopping at clip granularity once `cancel` is set.
pub fn analyze_clips_cancellable(
    analyzer: &ClipAnalyzer,
    paths: &[PathBuf],
    decoder: &dyn AudioDecoder,
    cancel: &AtomicBool,
) -> BatchOutcome {
    analyze_clips_detailed(analyzer, paths, decoder, Some(cancel))
}

/// Analyzes clips in parallel, keeping per-clip records.
pub fn analyze_clips_detailed(
    analyzer: &ClipAnalyzer,
    paths: &[PathBuf],
    decoder: &dyn AudioDecoder,
    cancel: Option<&AtomicBool>,
) -> BatchOutcome {
    let results: Vec<(PathBuf, Option<AnalyzedClip>)> = paths
        .par_iter()
        .map(|path| {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                return (path.clone(), None);
            }
            let clip = match analyzer.analyze_file(path, decoder) {
                Ok(analysis) => AnalyzedClip {
                    path: path.clone(),
                    category: analysis.category,
                    features: analysis.features,
                    analysis: Some(analysis),
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "clip analysis failed, filing as other");
                    AnalyzedClip {
                        path: path.clone(),
                        category: CategoryLabel::Other,
                        features: FeatureVector::default(),
                        analysis: None,
                    }
                }
            };
            (path.clone(), Some(clip))
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for (path, clip) in results {
        match clip {
            Some(clip) => outcome.clips.push(clip),
            None => outcome.skipped.push(path),
        }
    }

    tracing::info!(
        analyzed = outcome.clips.len(),
        failed = outcome.failed().count(),
        skipped = outcome.skipped.len(),
        "batch analysis complete"
    );
    outcome
}
