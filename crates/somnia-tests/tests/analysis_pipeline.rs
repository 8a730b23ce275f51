//! Batch analysis over generated clip folders.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p somnia-tests --test analysis_pipeline
//! ```

use std::sync::atomic::AtomicBool;

use pretty_assertions::assert_eq;
use somnia_analysis::{
    analyze_clips, analyze_clips_cancellable, analyze_clips_detailed, scan_audio_folder,
    ClipAnalyzer, SuitabilityScorer,
};
use somnia_backend_audio::WavDecoder;
use somnia_spec::{
    total_clips, CategoryLabel, ClipAnalysis, EngineConfig, Purpose, SleepPhase,
    ANALYSIS_VERSION,
};
use somnia_tests::{init_tracing, ClipFolderFixture};

const SR: u32 = 22_050;

fn decoder() -> WavDecoder {
    WavDecoder::new(SR, 1)
}

fn analyzer() -> ClipAnalyzer {
    init_tracing();
    let config = EngineConfig {
        sample_rate: SR,
        channels: 1,
        ..EngineConfig::default()
    };
    ClipAnalyzer::new(&config).unwrap()
}

fn mixed_folder() -> ClipFolderFixture {
    let fixture = ClipFolderFixture::new();
    fixture.add_noise("hiss/a.wav", 1, 3.0, SR);
    fixture.add_noise("hiss/b.wav", 2, 3.0, SR);
    fixture.add_sine("tones/hum.wav", 110.0, 3.0, SR);
    fixture.add_garbage("broken/c.wav");
    std::fs::write(fixture.path().join("notes.txt"), "not audio").unwrap();
    fixture
}

#[test]
fn scan_finds_audio_files_recursively_and_sorted() {
    let fixture = mixed_folder();
    let paths = scan_audio_folder(fixture.path());

    let names: Vec<String> = paths
        .iter()
        .map(|p| {
            p.strip_prefix(fixture.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(
        names,
        vec!["broken/c.wav", "hiss/a.wav", "hiss/b.wav", "tones/hum.wav"]
    );
}

#[test]
fn batch_returns_a_fresh_category_map() {
    let fixture = mixed_folder();
    let paths = scan_audio_folder(fixture.path());
    let analyzer = analyzer();

    let first = analyze_clips(&analyzer, &paths, &decoder());
    let second = analyze_clips(&analyzer, &paths, &decoder());

    assert_eq!(first, second);
    assert_eq!(total_clips(&first), 4);
}

#[test]
fn noise_is_white_noise_and_broken_clips_are_other() {
    let fixture = mixed_folder();
    let paths = scan_audio_folder(fixture.path());
    let outcome = analyze_clips_detailed(&analyzer(), &paths, &decoder(), None);

    let map = outcome.category_map();
    let white = &map[&CategoryLabel::WhiteNoise];
    assert_eq!(white.len(), 2);
    assert!(white.iter().all(|p| p.to_string_lossy().contains("hiss")));
    assert!(map[&CategoryLabel::Other]
        .iter()
        .any(|p| p.ends_with("broken/c.wav")));

    let failed: Vec<_> = outcome.failed().collect();
    assert_eq!(failed.len(), 1);
    let broken = outcome
        .clips
        .iter()
        .find(|c| c.analysis.is_none())
        .unwrap();
    assert!(broken.features.is_zero());
}

#[test]
fn cancelled_batch_skips_remaining_clips() {
    let fixture = mixed_folder();
    let paths = scan_audio_folder(fixture.path());
    let cancel = AtomicBool::new(true);

    let outcome = analyze_clips_cancellable(&analyzer(), &paths, &decoder(), &cancel);

    assert!(outcome.clips.is_empty());
    assert_eq!(outcome.skipped, paths);
}

#[test]
fn analysis_records_are_complete_and_serializable() {
    let fixture = ClipFolderFixture::new();
    let path = fixture.add_noise("a.wav", 5, 2.0, SR);
    let analysis = analyzer().analyze_file(&path, &decoder()).unwrap();

    assert_eq!(analysis.analysis_version, ANALYSIS_VERSION);
    assert_eq!(analysis.sample_rate, SR);
    assert_eq!(analysis.channels, 1);
    assert_eq!(analysis.content_hash.len(), 64);
    assert!((analysis.features.duration - 2.0).abs() < 0.05);
    for value in [
        analysis.metrics.sleep_induction_potential,
        analysis.metrics.relaxation_factor,
        analysis.metrics.ambient_score,
        analysis.metrics.masking_potential,
        analysis.metrics.loop_seamlessness,
    ] {
        assert!((0.0..=1.0).contains(&value), "metric out of range: {}", value);
    }

    let json = analysis.to_json().unwrap();
    let flat: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(flat.get("spectral_centroid").is_some());
    assert!(flat.get("arousal").is_some());
    assert!(flat.get("embedding").is_none());

    let back = ClipAnalysis::from_json(&json).unwrap();
    assert_eq!(back.path, analysis.path);
    assert_eq!(back.category, analysis.category);
    assert_eq!(back.content_hash, analysis.content_hash);
}

#[test]
fn selection_ranks_analyzed_clips_only() {
    let fixture = mixed_folder();
    let paths = scan_audio_folder(fixture.path());
    let outcome = analyze_clips_detailed(&analyzer(), &paths, &decoder(), None);
    let records = outcome.records();

    let scorer = SuitabilityScorer::default();
    let purpose = Purpose::Sleep {
        phase: SleepPhase::FallingAsleep,
    };
    let selected = scorer.select(&records, purpose);

    assert!(selected.len() <= 8);
    assert!(selected.iter().all(|c| c.score > 0.3 && c.score <= 1.0));
    assert!(selected.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(selected.iter().all(|c| !c.path.ends_with("broken/c.wav")));

    let map = scorer.select_category_map(&records, purpose);
    assert_eq!(total_clips(&map), selected.len());
}
