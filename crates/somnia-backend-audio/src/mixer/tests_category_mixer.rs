//! Tests for CategoryMixer bed construction.

use super::*;
use crate::effects::CrossfadeCurve;
use crate::rng::create_rng;
use pretty_assertions::assert_eq;
use somnia_spec::AudioBuffer;

const SR: u32 = 1000;

fn constant(value: f64, frames: usize) -> AudioBuffer {
    AudioBuffer::mono(vec![value; frames], SR)
}

#[test]
fn test_bed_has_exact_length() {
    let mixer = CategoryMixer::new(50, 2, SR);
    let sources = vec![constant(0.5, 300), constant(0.25, 170)];
    for target in [1, 49, 300, 301, 1234, 5000] {
        let mut rng = create_rng(3);
        let bed = mixer.build(&sources, target, &mut rng);
        assert_eq!(bed.num_frames(), target);
        assert_eq!(bed.num_channels(), 2);
    }
}

#[test]
fn test_no_sources_gives_silence() {
    let mixer = CategoryMixer::new(50, 2, SR);
    let mut rng = create_rng(1);
    let bed = mixer.build(&[], 800, &mut rng);
    assert_eq!(bed.num_frames(), 800);
    assert!(bed.is_silent());
}

#[test]
fn test_empty_sources_are_ignored() {
    let mixer = CategoryMixer::new(10, 1, SR);
    let mut rng = create_rng(1);
    let sources = vec![AudioBuffer::mono(Vec::new(), SR)];
    let bed = mixer.build(&sources, 100, &mut rng);
    assert!(bed.is_silent());

    let sources = vec![AudioBuffer::mono(Vec::new(), SR), constant(0.5, 40)];
    let bed = mixer.build(&sources, 100, &mut rng);
    assert!(!bed.is_silent());
}

#[test]
fn test_zero_target_is_empty() {
    let mixer = CategoryMixer::new(10, 2, SR);
    let mut rng = create_rng(1);
    let bed = mixer.build(&[constant(0.5, 40)], 0, &mut rng);
    assert!(bed.is_empty());
}

#[test]
fn test_first_clip_is_copied_verbatim() {
    let mixer = CategoryMixer::new(100, 1, SR);
    let ramp: Vec<f64> = (0..500).map(|i| i as f64 / 1000.0).collect();
    let sources = vec![AudioBuffer::mono(ramp.clone(), SR)];
    let mut rng = create_rng(9);
    let bed = mixer.build(&sources, 400, &mut rng);
    assert_eq!(bed.channel(0).unwrap(), &ramp[..400]);
}

#[test]
fn test_linear_crossfade_of_equal_clips_is_flat() {
    let mixer = CategoryMixer::new(20, 1, SR).with_curve(CrossfadeCurve::Linear);
    let mut rng = create_rng(5);
    let bed = mixer.build(&[constant(0.5, 100)], 350, &mut rng);
    for &s in bed.channel(0).unwrap() {
        assert!((s - 0.5).abs() < 1e-12);
    }
}

#[test]
fn test_clip_shorter_than_crossfade() {
    let mixer = CategoryMixer::new(1000, 1, SR).with_curve(CrossfadeCurve::Linear);
    let mut rng = create_rng(5);
    let bed = mixer.build(&[constant(0.5, 10)], 95, &mut rng);
    assert_eq!(bed.num_frames(), 95);
    for &s in bed.channel(0).unwrap() {
        assert!((s - 0.5).abs() < 1e-12);
    }
}

#[test]
fn test_single_frame_clips_terminate() {
    let mixer = CategoryMixer::new(1000, 1, SR);
    let mut rng = create_rng(5);
    let bed = mixer.build(&[constant(0.5, 1)], 64, &mut rng);
    assert_eq!(bed.num_frames(), 64);
}

#[test]
fn test_same_seed_same_bed() {
    let mixer = CategoryMixer::new(30, 2, SR);
    let sources = vec![constant(0.1, 120), constant(0.2, 90), constant(0.3, 60)];
    let a = mixer.build(&sources, 2000, &mut create_rng(77));
    let b = mixer.build(&sources, 2000, &mut create_rng(77));
    assert_eq!(a, b);
}

#[test]
fn test_sources_are_not_mutated() {
    let mixer = CategoryMixer::new(30, 2, SR).with_clip_headroom(-1.0);
    let sources = vec![constant(0.1, 120), constant(0.2, 90)];
    let before = sources.clone();
    let _ = mixer.build(&sources, 1000, &mut create_rng(2));
    assert_eq!(sources, before);
}

#[test]
fn test_clip_headroom_normalizes() {
    let mixer = CategoryMixer::new(0, 1, SR).with_clip_headroom(0.0);
    let bed = mixer.build(&[constant(0.25, 50)], 200, &mut create_rng(2));
    for &s in bed.channel(0).unwrap() {
        assert!((s - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_mono_source_fills_stereo_bed() {
    let mixer = CategoryMixer::new(0, 2, SR);
    let bed = mixer.build(&[constant(0.4, 50)], 120, &mut create_rng(2));
    assert_eq!(bed.channel(0), bed.channel(1));
}
