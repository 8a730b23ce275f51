//! Tests for LayerCompositor.

use std::collections::BTreeMap;

use super::*;
use pretty_assertions::assert_eq;
use somnia_spec::{AudioBuffer, CategoryLabel};

const SR: u32 = 1000;

fn bed(value: f64, frames: usize) -> AudioBuffer {
    AudioBuffer::stereo(vec![value; frames], vec![value; frames], SR)
}

#[test]
fn test_compose_without_beds_is_silent() {
    let compositor = LayerCompositor::new(-3.0, 2, SR);
    let master = compositor.compose(&BTreeMap::new(), &BTreeMap::new(), 500);
    assert_eq!(master.num_frames(), 500);
    assert_eq!(master.num_channels(), 2);
    assert!(master.is_silent());
}

#[test]
fn test_gains_are_applied_and_summed() {
    let compositor = LayerCompositor::new(-3.0, 2, SR);
    let mut beds = BTreeMap::new();
    beds.insert(CategoryLabel::Rain, bed(0.2, 100));
    beds.insert(CategoryLabel::Water, bed(0.2, 100));
    let mut gains = BTreeMap::new();
    gains.insert(CategoryLabel::Rain, 0.0);
    gains.insert(CategoryLabel::Water, -20.0);

    let master = compositor.compose(&beds, &gains, 100);
    let expected = 0.2 + 0.2 * 0.1;
    for channel in master.channels() {
        for &s in channel {
            assert!((s - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn test_missing_gain_uses_fallback() {
    let compositor = LayerCompositor::new(-20.0, 1, SR);
    let mut beds = BTreeMap::new();
    beds.insert(CategoryLabel::Thunder, AudioBuffer::mono(vec![1.0; 10], SR));

    let master = compositor.compose(&beds, &BTreeMap::new(), 10);
    assert!((master.channels()[0][0] - 0.1).abs() < 1e-12);
    assert_eq!(compositor.gain_db(CategoryLabel::Other, &BTreeMap::new()), -20.0);
}

#[test]
fn test_length_is_target_regardless_of_beds() {
    let compositor = LayerCompositor::new(-3.0, 2, SR);
    let mut beds = BTreeMap::new();
    beds.insert(CategoryLabel::Rain, bed(0.1, 50));
    beds.insert(CategoryLabel::Nature, bed(0.1, 500));
    beds.insert(CategoryLabel::Other, bed(0.1, 0));

    let master = compositor.compose(&beds, &BTreeMap::new(), 200);
    assert_eq!(master.num_frames(), 200);
    assert!(master.channels()[0][100] != 0.0);
}

#[test]
fn test_overlay_bed_matches_compose() {
    let compositor = LayerCompositor::new(-6.0, 2, SR);
    let mut gains = BTreeMap::new();
    gains.insert(CategoryLabel::Rain, -3.0);
    let rain = bed(0.3, 200);
    let water = bed(-0.1, 150);

    let mut beds = BTreeMap::new();
    beds.insert(CategoryLabel::Rain, rain.clone());
    beds.insert(CategoryLabel::Water, water.clone());
    let composed = compositor.compose(&beds, &gains, 200);

    let mut layered = compositor.silent_master(200);
    compositor.overlay_bed(&mut layered, CategoryLabel::Rain, &rain, &gains);
    drop(rain);
    compositor.overlay_bed(&mut layered, CategoryLabel::Water, &water, &gains);
    compositor.overlay_bed(&mut layered, CategoryLabel::Other, &bed(0.5, 0), &gains);

    assert_eq!(layered.num_frames(), 200);
    assert_eq!(layered.channels(), composed.channels());
}
