//! High-pass detail extraction via blur-and-invert blending.

use image::Rgb32FImage;
use imageproc::filter::separable_filter_equal;
use tracing::debug;

use crate::layer::Layer;

/// Extract detail as a mid-gray-centred map.
///
/// ```text
/// blur = gaussian(in, kernel_size)
/// out  = 0.5 × in + 0.5 × (1 − blur)
///      = 0.5 + 0.5 × (in − blur)
/// ```
///
/// Flat regions (where the input equals its own blur) come out at exactly 0.5.
/// `kernel_size` is forced odd: even sizes are bumped up by one.
pub fn high_pass(layer: &Layer, kernel_size: u32) -> Layer {
    let kernel_size = odd_kernel_size(kernel_size);
    debug!(kernel_size, "high pass");

    let blurred = gaussian_blur(layer, kernel_size);
    layer
        .zip_map(&blurred, |px, b| {
            [
                0.5 * px[0] + 0.5 * (1.0 - b[0]),
                0.5 * px[1] + 0.5 * (1.0 - b[1]),
                0.5 * px[2] + 0.5 * (1.0 - b[2]),
            ]
        })
        .unwrap_or_else(|_| layer.clone())
}

/// Gaussian blur with a square `kernel_size × kernel_size` separable kernel.
///
/// Edges are handled by clamping to the nearest pixel.
pub fn gaussian_blur(layer: &Layer, kernel_size: u32) -> Layer {
    if layer.is_empty() {
        return layer.clone();
    }
    let kernel = gaussian_kernel(odd_kernel_size(kernel_size));
    let image = layer.to_rgb32f();
    let blurred: Rgb32FImage = separable_filter_equal(&image, &kernel);
    Layer::from_rgb32f(&blurred)
}

/// Normalized 1-D Gaussian weights of length `size` (odd).
///
/// Sigma follows the usual derivation from aperture size:
///
/// ```text
/// sigma = 0.3 × ((size − 1) × 0.5 − 1) + 0.8
/// ```
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let size = odd_kernel_size(size);
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let radius = (size / 2) as i32;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

fn odd_kernel_size(size: u32) -> u32 {
    if size % 2 == 0 { size + 1 } else { size }
}
