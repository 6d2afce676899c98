//! Logarithmic tone mapping.

use tracing::debug;

use crate::layer::Layer;

/// Apply a logarithmic stretch to every channel.
///
/// ```text
/// out = ln(1 + strength × max(in, 0)) / ln(1 + strength)
/// ```
///
/// The curve maps 0 → 0 and 1 → 1. Higher strength lifts shadows further and
/// compresses highlights harder. As `strength → 0` the curve tends to the
/// identity, so non-positive or non-finite strengths return the layer unchanged.
pub fn log_stretch(layer: &Layer, strength: f32) -> Layer {
    if !strength.is_finite() || strength <= 0.0 {
        debug!(strength, "log stretch skipped");
        return layer.clone();
    }
    debug!(strength, "log stretch");

    let norm = strength.ln_1p();
    layer.map_pixels(|rgb| rgb.map(|c| (strength * c.max(0.0)).ln_1p() / norm))
}
