//! Layering of category beds into the master.

use std::collections::BTreeMap;

use somnia_spec::{AudioBuffer, CategoryLabel};
use tracing::debug;

use super::types::MasterBuffer;
use crate::effects::db_to_amp;

/// Sums category beds into one master buffer with per-category gain.
#[derive(Debug, Clone)]
pub struct LayerCompositor {
    /// Gain for categories without an entry in the gain map, in dB.
    fallback_gain_db: f64,
    num_channels: usize,
    sample_rate: u32,
}

impl LayerCompositor {
    /// Creates a new compositor.
    pub fn new(fallback_gain_db: f64, num_channels: usize, sample_rate: u32) -> Self {
        Self {
            fallback_gain_db,
            num_channels: num_channels.max(1),
            sample_rate,
        }
    }

    /// Gain applied to `label`, in dB.
    pub fn gain_db(&self, label: CategoryLabel, gains_db: &BTreeMap<CategoryLabel, f64>) -> f64 {
        gains_db.get(&label).copied().unwrap_or(self.fallback_gain_db)
    }

    /// Overlays every non-empty bed onto a silent master of `target_frames`.
    ///
    /// # Arguments
    /// * `beds` - Category beds, normally already `target_frames` long
    /// * `gains_db` - Per-category gain in dB
    /// * `target_frames` - Length of the master
    ///
    /// # Returns
    /// A master of exactly `target_frames` frames. Longer beds are cut;
    /// shorter beds leave the remainder untouched.
    pub fn compose(
        &self,
        beds: &BTreeMap<CategoryLabel, AudioBuffer>,
        gains_db: &BTreeMap<CategoryLabel, f64>,
        target_frames: usize,
    ) -> MasterBuffer {
        let mut master = self.silent_master(target_frames);
        for (&label, bed) in beds {
            self.overlay_bed(&mut master, label, bed, gains_db);
        }
        master
    }

    /// A silent master in this compositor's layout.
    pub fn silent_master(&self, target_frames: usize) -> MasterBuffer {
        MasterBuffer::silent(target_frames, self.num_channels, self.sample_rate)
    }

    /// Adds one category bed to `master` at its gain. Empty beds are skipped.
    ///
    /// Lets callers layer each bed as soon as it is built and drop it before
    /// building the next one.
    pub fn overlay_bed(
        &self,
        master: &mut MasterBuffer,
        label: CategoryLabel,
        bed: &AudioBuffer,
        gains_db: &BTreeMap<CategoryLabel, f64>,
    ) {
        if bed.is_empty() {
            return;
        }
        let gain_db = self.gain_db(label, gains_db);
        debug!(category = %label, gain_db, "layering bed");
        master.overlay(bed, db_to_amp(gain_db));
    }
}
