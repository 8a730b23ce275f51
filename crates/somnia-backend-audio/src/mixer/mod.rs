//! Category beds and layer compositing.
//!
//! [`CategoryMixer`] turns the clips of one category into a continuous bed of
//! the target length; [`LayerCompositor`] sums the beds into a
//! [`MasterBuffer`] with the active profile's per-category gains.

mod category_mixer;
mod compositor;
mod types;

#[cfg(test)]
mod tests_category_mixer;
#[cfg(test)]
mod tests_compositor;
#[cfg(test)]
mod tests_master_buffer;

// Re-export public API
pub use category_mixer::CategoryMixer;
pub use compositor::LayerCompositor;
pub use types::{FrozenMaster, MasterBuffer};
