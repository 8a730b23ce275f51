//! Sample-level effects used by the mix pipeline.

pub mod dynamics;
pub mod fade;

pub use dynamics::{amp_to_db, apply_compressor, compress_sample, db_to_amp};
pub use fade::{apply_fades, crossfade_gains, fade_in, fade_out, CrossfadeCurve};
