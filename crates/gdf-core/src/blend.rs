//! Original/processed blending for the comparison slider.

use crate::error::PipelineError;
use crate::layer::Layer;

/// Linear blend between the original and processed layers.
///
/// ```text
/// out = (1 − alpha) × original + alpha × processed
/// ```
///
/// `alpha` is clamped to `[0, 1]`. At 0 the original is returned exactly and
/// at 1 the processed layer is returned exactly.
pub fn blend(original: &Layer, processed: &Layer, alpha: f32) -> Result<Layer, PipelineError> {
    let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };

    if original.dimensions() != processed.dimensions() {
        return Err(PipelineError::DimensionMismatch {
            expected: original.dimensions(),
            actual: processed.dimensions(),
        });
    }
    if alpha == 0.0 {
        return Ok(original.clone());
    }
    if alpha == 1.0 {
        return Ok(processed.clone());
    }

    let inv = 1.0 - alpha;
    original.zip_map(processed, |o, p| {
        [
            inv * o[0] + alpha * p[0],
            inv * o[1] + alpha * p[1],
            inv * o[2] + alpha * p[2],
        ]
    })
}
