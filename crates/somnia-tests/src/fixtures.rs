//! Test fixture utilities for creating folders of synthetic clips.

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tempfile::TempDir;

/// Installs a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A temporary folder of generated WAV clips.
pub struct ClipFolderFixture {
    pub root: TempDir,
}

impl Default for ClipFolderFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipFolderFixture {
    /// Create a new empty folder.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the folder path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    fn clip_path(&self, name: &str) -> PathBuf {
        let path = self.root.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create clip dir");
        }
        path
    }

    /// Write a 16-bit WAV from mono samples.
    ///
    /// # Arguments
    /// * `name` - Relative file name, may contain subdirectories
    /// * `samples` - Mono samples in [-1, 1]
    /// * `sample_rate` - Sample rate in Hz
    /// * `channels` - Channel count; the mono signal is copied to each
    pub fn add_samples(
        &self,
        name: &str,
        samples: &[f64],
        sample_rate: u32,
        channels: u16,
    ) -> PathBuf {
        let path = self.clip_path(name);
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).expect("Failed to create wav");
        for &s in samples {
            let value = (s.clamp(-1.0, 1.0) * 32767.0).round() as i16;
            for _ in 0..channels {
                writer.write_sample(value).expect("Failed to write sample");
            }
        }
        writer.finalize().expect("Failed to finalize wav");
        path
    }

    /// Write a sine clip.
    pub fn add_sine(&self, name: &str, freq: f64, secs: f64, sample_rate: u32) -> PathBuf {
        self.add_samples(name, &sine(freq, secs, sample_rate, 0.5), sample_rate, 1)
    }

    /// Write a white noise clip from a seeded PCG32.
    pub fn add_noise(&self, name: &str, seed: u64, secs: f64, sample_rate: u32) -> PathBuf {
        self.add_samples(name, &white_noise(seed, secs, sample_rate, 0.5), sample_rate, 2)
    }

    /// Write a file that is not audio.
    pub fn add_garbage(&self, name: &str) -> PathBuf {
        let path = self.clip_path(name);
        fs::write(&path, b"this is not a wav file").expect("Failed to write file");
        path
    }
}

/// A sine of `secs` seconds.
pub fn sine(freq: f64, secs: f64, sample_rate: u32, amplitude: f64) -> Vec<f64> {
    let frames = (secs * sample_rate as f64) as usize;
    (0..frames)
        .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin())
        .collect()
}

/// Uniform white noise of `secs` seconds.
pub fn white_noise(seed: u64, secs: f64, sample_rate: u32, amplitude: f64) -> Vec<f64> {
    let frames = (secs * sample_rate as f64) as usize;
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..frames)
        .map(|_| amplitude * rng.gen_range(-1.0..1.0))
        .collect()
}
