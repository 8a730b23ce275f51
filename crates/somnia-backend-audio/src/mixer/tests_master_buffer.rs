//! Tests for MasterBuffer.

use super::*;
use pretty_assertions::assert_eq;
use somnia_spec::AudioBuffer;

#[test]
fn test_overlay_mono_onto_stereo() {
    let mut master = MasterBuffer::silent(4, 2, 100);
    master.overlay(&AudioBuffer::mono(vec![1.0, 2.0, 3.0, 4.0, 5.0], 100), 0.5);
    assert_eq!(master.channels()[0], vec![0.5, 1.0, 1.5, 2.0]);
    assert_eq!(master.channels()[1], vec![0.5, 1.0, 1.5, 2.0]);
}

#[test]
fn test_overlay_is_additive() {
    let mut master = MasterBuffer::silent(2, 1, 100);
    let buffer = AudioBuffer::mono(vec![0.25, 0.25], 100);
    master.overlay(&buffer, 1.0);
    master.overlay(&buffer, 1.0);
    assert_eq!(master.channels()[0], vec![0.5, 0.5]);
}

#[test]
fn test_upmix_to_stereo() {
    let mut master = MasterBuffer::from_buffer(AudioBuffer::mono(vec![0.1, 0.2], 100));
    master.upmix_to_stereo();
    assert_eq!(master.num_channels(), 2);
    assert_eq!(master.channels()[0], master.channels()[1]);
}

#[test]
fn test_freeze_keeps_audio() {
    let mut master = MasterBuffer::silent(3, 2, 100);
    master.overlay(&AudioBuffer::mono(vec![0.1, 0.2, 0.3], 100), 1.0);
    let frozen = master.freeze();
    assert_eq!(frozen.num_frames(), 3);
    assert_eq!(frozen.buffer().channel(1).unwrap(), &[0.1, 0.2, 0.3]);
    assert!((frozen.duration_ms() - 30.0).abs() < 1e-9);
}
