//! Filter modules: the building blocks the presets are composed from.
//!
//! Every filter takes a layer by reference and returns a new layer of the
//! same dimensions with all channels clamped to `[0, 1]`.

pub mod clahe;
pub mod high_pass;
pub mod tone;

pub use clahe::{DEFAULT_TILE_GRID, adaptive_contrast};
pub use high_pass::{gaussian_blur, high_pass};
pub use tone::log_stretch;
