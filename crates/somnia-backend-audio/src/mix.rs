//! End-to-end mix rendering and export.
//!
//! [`MixCreator`] turns a [`MixRequest`] into a finished master:
//!
//! ```text
//! category clips ─► CategoryMixer (per category) ─► LayerCompositor
//!                ─► MasterProcessor ─► [binaural overlay] ─► FrozenMaster
//! ```
//!
//! Every failure before export is recovered and logged: undecodable clips
//! are skipped, empty categories become silence, unknown mix types fall back
//! to the `sleep` profile and invalid binaural parameters drop the layer.
//! Only export can fail a mix.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use somnia_spec::{
    AudioBuffer, AudioDecoder, AudioEncoder, EngineConfig, MixProfile, MixRequest, MixTags,
    ProfileRegistry,
};
use tracing::{info, warn};

use crate::binaural::{overlay_binaural, BinauralBeatSynthesizer, BinauralParams};
use crate::error::{MixError, MixResult};
use crate::master::MasterProcessor;
use crate::mixer::{CategoryMixer, FrozenMaster, LayerCompositor, MasterBuffer};
use crate::processing::limit_peak;
use crate::resample::resample;
use crate::rng::create_category_rng;
use crate::wav::buffer_to_pcm16;

/// Preview length used when the caller does not pick one.
pub const DEFAULT_PREVIEW_SECS: u64 = 30;

/// Title written on saved previews.
pub const PREVIEW_TITLE: &str = "Mix Preview";

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq)]
pub struct MixOutcome {
    /// Where the mix was written.
    pub path: PathBuf,
    /// Rendered length.
    pub duration_ms: u64,
    /// Tags embedded in the file.
    pub tags: MixTags,
    /// BLAKE3 of the 16-bit interleaved PCM.
    pub pcm_hash: String,
}

/// Renders and exports mixes.
#[derive(Debug, Clone)]
pub struct MixCreator {
    config: EngineConfig,
    registry: ProfileRegistry,
}

impl MixCreator {
    /// Creates a mix creator with the built-in profiles.
    ///
    /// # Errors
    /// Returns [`MixError::Config`] if `config` fails validation.
    pub fn new(config: EngineConfig) -> MixResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: ProfileRegistry::builtin(),
        })
    }

    /// Replaces the profile registry.
    pub fn with_registry(mut self, registry: ProfileRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the profile registry.
    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Renders the mix described by `request` in memory.
    ///
    /// # Errors
    /// Returns [`MixError::Config`] for a non-positive duration. Every other
    /// problem is logged and recovered.
    pub fn render_mix(
        &self,
        request: &MixRequest,
        decoder: &dyn AudioDecoder,
    ) -> MixResult<FrozenMaster> {
        request.validate()?;
        let profile = self.registry.resolve_or_default(&request.mix_type);
        let sample_rate = self.config.sample_rate;
        let num_channels = self.config.channels;
        let target_frames = request.target_frames(sample_rate);

        info!(
            mix_type = %request.mix_type,
            profile = %profile.name,
            duration_ms = request.target_duration_ms(),
            categories = request.categories.len(),
            "rendering mix"
        );

        let compositor =
            LayerCompositor::new(self.config.fallback_gain_db, num_channels, sample_rate);
        let mut master = compositor.silent_master(target_frames);
        self.layer_beds(&mut master, &compositor, request, profile, decoder);

        MasterProcessor::new(self.config.master.clone()).process(&mut master, profile)?;

        if let Some(binaural) = &request.binaural {
            let params = BinauralParams {
                duration_ms: request.target_duration_ms(),
                base_freq: binaural.base_freq,
                beat_freq: binaural.beat_freq,
                sample_rate,
            };
            let synth = BinauralBeatSynthesizer::new(self.config.binaural.gain_db);
            if let Some(layer) = synth.generate(&params) {
                overlay_binaural(&mut master, &layer);
                limit_peak(master.channels_mut(), 1.0);
                info!("Added binaural beats to the mix");
            }
        }

        Ok(master.freeze())
    }

    /// Builds each category bed and layers it into `master` before the next.
    fn layer_beds(
        &self,
        master: &mut MasterBuffer,
        compositor: &LayerCompositor,
        request: &MixRequest,
        profile: &MixProfile,
        decoder: &dyn AudioDecoder,
    ) {
        let sample_rate = self.config.sample_rate;
        let target_frames = master.num_frames();
        let crossfade = AudioBuffer::frames_for_ms(profile.crossfade_ms, sample_rate);
        let mixer = CategoryMixer::new(crossfade, self.config.channels, sample_rate)
            .with_clip_headroom(self.config.master.clip_headroom_db);

        for (&label, paths) in &request.categories {
            let sources = self.load_sources(paths, decoder);
            if sources.is_empty() {
                warn!("{}; using silence", MixError::EmptyCategory { category: label });
            }
            let mut rng = create_category_rng(request.seed, label);
            let bed = mixer.build(&sources, target_frames, &mut rng);
            compositor.overlay_bed(master, label, &bed, &profile.gains_db);
        }
    }

    fn load_sources(&self, paths: &[PathBuf], decoder: &dyn AudioDecoder) -> Vec<AudioBuffer> {
        paths
            .iter()
            .filter_map(|path| {
                let decoded = decoder
                    .decode(path)
                    .and_then(|buffer| resample(buffer, self.config.sample_rate));
                match decoded {
                    Ok(buffer) => Some(buffer),
                    Err(e) => {
                        warn!("Error loading {}: {}", path.display(), e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Renders and exports the mix to `request.output_path`.
    ///
    /// # Errors
    /// Returns [`MixError::Export`] if the encoder fails; no partial output
    /// is reported as success.
    pub fn create_mix(
        &self,
        request: &MixRequest,
        decoder: &dyn AudioDecoder,
        encoder: &dyn AudioEncoder,
    ) -> MixResult<MixOutcome> {
        self.create_mix_at(request, decoder, encoder, Utc::now())
    }

    /// Like [`MixCreator::create_mix`] with an explicit timestamp for the tags.
    pub fn create_mix_at(
        &self,
        request: &MixRequest,
        decoder: &dyn AudioDecoder,
        encoder: &dyn AudioEncoder,
        now: DateTime<Utc>,
    ) -> MixResult<MixOutcome> {
        let master = self.render_mix(request, decoder)?;
        let tags = MixTags::for_mix(&request.mix_type, now);
        export(&master, &tags, &request.output_path, encoder)?;

        let outcome = MixOutcome {
            path: request.output_path.clone(),
            duration_ms: master.duration_ms().round() as u64,
            tags,
            pcm_hash: pcm_hash(&master),
        };
        info!(path = %outcome.path.display(), "Created mix");
        Ok(outcome)
    }

    /// Renders a short preview of `request`.
    ///
    /// The preview uses the full pipeline with the length capped at
    /// `preview_secs`.
    pub fn preview_mix(
        &self,
        request: &MixRequest,
        decoder: &dyn AudioDecoder,
        preview_secs: u64,
    ) -> MixResult<FrozenMaster> {
        let mut preview = request.clone();
        preview.duration_minutes = request.duration_minutes.min(preview_secs as f64 / 60.0);
        self.render_mix(&preview, decoder)
    }
}

/// Writes a rendered preview to `path` with a fixed title.
pub fn save_preview(
    preview: &FrozenMaster,
    path: &Path,
    encoder: &dyn AudioEncoder,
) -> MixResult<()> {
    let tags = MixTags {
        title: PREVIEW_TITLE.to_string(),
        date: String::new(),
        genre: String::new(),
    };
    export(preview, &tags, path, encoder)
}

fn export(
    master: &FrozenMaster,
    tags: &MixTags,
    path: &Path,
    encoder: &dyn AudioEncoder,
) -> MixResult<()> {
    encoder
        .encode(master.buffer(), tags, path)
        .map_err(|source| MixError::Export {
            path: path.to_path_buf(),
            source,
        })
}

/// BLAKE3 of the master as 16-bit interleaved PCM.
pub fn pcm_hash(master: &FrozenMaster) -> String {
    blake3::hash(&buffer_to_pcm16(master.buffer()))
        .to_hex()
        .to_string()
}
