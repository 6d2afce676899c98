//! GDF Core: image enhancement pipeline.
//!
//! Holds the normalized RGB layer type, decoding, the three filter modules
//! (log stretch, adaptive contrast, high pass), the fixed presets composed
//! from them, and blending for the original/processed comparison slider.
//! No threading or UI dependencies.

pub mod blend;
pub mod error;
pub mod filters;
pub mod layer;
pub mod loader;
pub mod preset;
pub mod processor;
pub mod stats;

// Re-exports for convenience.
pub use blend::blend;
pub use error::PipelineError;
pub use filters::{adaptive_contrast, high_pass, log_stretch};
pub use layer::Layer;
pub use loader::load;
pub use preset::{Preset, apply_preset};
pub use processor::ImageProcessor;
pub use stats::LayerStats;
