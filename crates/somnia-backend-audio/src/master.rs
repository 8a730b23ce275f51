//! Master bus processing.
//!
//! Runs a fixed chain on the composited master, in order:
//!
//! 1. Linear fade-in and fade-out from the profile
//! 2. Low-pass or band-pass shaping from the profile
//! 3. Static soft-knee compression
//! 4. Peak normalization to the configured headroom
//!
//! The chain is deterministic and only touches the buffer it is given.

use somnia_spec::{AudioBuffer, MasterSettings, MixProfile};
use tracing::debug;

use crate::effects::{apply_compressor, apply_fades};
use crate::error::MixResult;
use crate::filter::apply_shaping;
use crate::mixer::MasterBuffer;
use crate::processing::normalize;

/// Applies the master chain.
#[derive(Debug, Clone, Default)]
pub struct MasterProcessor {
    settings: MasterSettings,
}

impl MasterProcessor {
    /// Creates a processor with the given settings.
    pub fn new(settings: MasterSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &MasterSettings {
        &self.settings
    }

    /// Processes `master` in place. The length never changes.
    ///
    /// # Errors
    /// Returns [`crate::MixError::InvalidParameter`] when the compressor
    /// settings are out of range; the buffer is then left after the filter
    /// stage.
    pub fn process(&self, master: &mut MasterBuffer, profile: &MixProfile) -> MixResult<()> {
        let sample_rate = master.sample_rate();
        let fade_in = AudioBuffer::frames_for_ms(profile.fade_in_ms, sample_rate);
        let fade_out = AudioBuffer::frames_for_ms(profile.fade_out_ms, sample_rate);
        let channels = master.channels_mut();

        apply_fades(channels, fade_in, fade_out);
        apply_shaping(channels, &profile.shaping, self.settings.filter_q, sample_rate);
        apply_compressor(
            channels,
            self.settings.compressor_threshold_db,
            self.settings.compressor_ratio,
        )?;
        normalize(channels, self.settings.normalize_headroom_db);

        debug!(
            profile = %profile.name,
            fade_in,
            fade_out,
            peak = master.peak(),
            "master processed"
        );
        Ok(())
    }
}
