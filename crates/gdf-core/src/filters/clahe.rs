//! Contrast-limited adaptive histogram equalization (CLAHE) on luminance.
//!
//! The layer is converted to CIE L*a*b* (D65). Only L* is equalized; a* and b*
//! pass through untouched so hue is preserved. The image is split into a grid
//! of tiles, each tile gets its own clipped histogram and CDF lookup table, and
//! every pixel is mapped by bilinear interpolation between the lookup tables of
//! the four nearest tile centres.

use palette::{IntoColor, Lab, Srgb};
use tracing::debug;

use crate::layer::Layer;

/// Tile grid used by all presets, as `(columns, rows)`.
pub const DEFAULT_TILE_GRID: (u32, u32) = (8, 8);

/// Histogram resolution for the luminance channel.
const BINS: usize = 256;

/// Maximum value of CIE L*.
const L_MAX: f32 = 100.0;

/// Equalize luminance in local tiles with contrast clipping.
///
/// - `clip_limit`: histogram clip relative to a uniform distribution. A bin may
///   hold at most `clip_limit × tile_area / 256` samples; the excess is spread
///   over all bins. `clip_limit <= 0` disables clipping.
/// - `tile_grid`: `(columns, rows)`, clamped to the image dimensions.
pub fn adaptive_contrast(layer: &Layer, clip_limit: f32, tile_grid: (u32, u32)) -> Layer {
    if layer.is_empty() {
        return layer.clone();
    }
    let (width, height) = layer.dimensions();
    debug!(clip_limit, ?tile_grid, width, height, "adaptive contrast");

    let lab: Vec<Lab> = layer
        .pixels()
        .iter()
        .map(|&[r, g, b]| Srgb::new(r, g, b).into_color())
        .collect();
    let bins: Vec<u8> = lab.iter().map(|p| luminance_bin(p.l)).collect();

    let equalized = equalize_tiles(&bins, width as usize, height as usize, clip_limit, tile_grid);

    let pixels = lab
        .iter()
        .zip(equalized)
        .map(|(p, l)| {
            let rgb: Srgb = Lab { l: l * L_MAX, ..*p }.into_color();
            [rgb.red, rgb.green, rgb.blue]
        })
        .collect();
    Layer::from_pixels(width, height, pixels)
}

/// Quantize L* in `[0, 100]` to a histogram bin.
fn luminance_bin(l: f32) -> u8 {
    let scaled = (l / L_MAX * (BINS - 1) as f32).round();
    if scaled.is_nan() {
        0
    } else {
        scaled.clamp(0.0, (BINS - 1) as f32) as u8
    }
}

/// Run CLAHE on a row-major bin image. Returns equalized values in `[0, 1]`.
fn equalize_tiles(
    bins: &[u8],
    width: usize,
    height: usize,
    clip_limit: f32,
    tile_grid: (u32, u32),
) -> Vec<f32> {
    let cols = (tile_grid.0 as usize).clamp(1, width);
    let rows = (tile_grid.1 as usize).clamp(1, height);

    // Tile i spans [bounds[i], bounds[i + 1]). Every tile is at least one pixel wide.
    let x_bounds: Vec<usize> = (0..=cols).map(|i| i * width / cols).collect();
    let y_bounds: Vec<usize> = (0..=rows).map(|i| i * height / rows).collect();

    let mut luts = Vec::with_capacity(cols * rows);
    for ty in 0..rows {
        for tx in 0..cols {
            let (x0, x1) = (x_bounds[tx], x_bounds[tx + 1]);
            let (y0, y1) = (y_bounds[ty], y_bounds[ty + 1]);

            let mut hist = [0u32; BINS];
            for y in y0..y1 {
                for &b in &bins[y * width + x0..y * width + x1] {
                    hist[b as usize] += 1;
                }
            }

            let area = ((x1 - x0) * (y1 - y0)) as u32;
            if clip_limit > 0.0 {
                clip_histogram(&mut hist, clip_threshold(clip_limit, area));
            }
            luts.push(build_lut(&hist, area));
        }
    }

    let tile_w = width as f32 / cols as f32;
    let tile_h = height as f32 / rows as f32;
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        let (ty0, ty1, fy) = neighbour_tiles(y, tile_h, rows);
        for x in 0..width {
            let (tx0, tx1, fx) = neighbour_tiles(x, tile_w, cols);
            let bin = bins[y * width + x] as usize;

            let top = lerp(luts[ty0 * cols + tx0][bin], luts[ty0 * cols + tx1][bin], fx);
            let bottom = lerp(luts[ty1 * cols + tx0][bin], luts[ty1 * cols + tx1][bin], fx);
            out.push(lerp(top, bottom, fy));
        }
    }
    out
}

/// Per-bin sample cap for a tile of `area` pixels.
fn clip_threshold(clip_limit: f32, area: u32) -> u32 {
    ((clip_limit * area as f32 / BINS as f32) as u32).max(1)
}

/// Cap every bin at `limit` and redistribute the clipped excess.
///
/// The excess is spread evenly; the remainder that does not divide evenly is
/// handed out one sample at a time at a fixed stride across the histogram.
fn clip_histogram(hist: &mut [u32; BINS], limit: u32) {
    let mut excess = 0u32;
    for count in hist.iter_mut() {
        if *count > limit {
            excess += *count - limit;
            *count = limit;
        }
    }
    if excess == 0 {
        return;
    }

    let per_bin = excess / BINS as u32;
    let mut residual = (excess % BINS as u32) as usize;
    for count in hist.iter_mut() {
        *count += per_bin;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Normalized cumulative distribution, `lut[bin]` in `[0, 1]`.
fn build_lut(hist: &[u32; BINS], area: u32) -> [f32; BINS] {
    let mut lut = [0.0_f32; BINS];
    let scale = 1.0 / area.max(1) as f32;
    let mut cumulative = 0u32;
    for (slot, &count) in lut.iter_mut().zip(hist) {
        cumulative += count;
        *slot = (cumulative as f32 * scale).min(1.0);
    }
    lut
}

/// The two tile indices whose centres bracket `pos`, and the weight of the second.
fn neighbour_tiles(pos: usize, tile_size: f32, count: usize) -> (usize, usize, f32) {
    let t = (pos as f32 + 0.5) / tile_size - 0.5;
    let lower = t.floor();
    let frac = t - lower;
    let last = count as isize - 1;
    let lower = lower as isize;
    (
        lower.clamp(0, last) as usize,
        (lower + 1).clamp(0, last) as usize,
        frac,
    )
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn gradient(width: u32, height: u32, lo: f32, hi: f32) -> Layer {
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for _y in 0..height {
            for x in 0..width {
                let v = lo + (hi - lo) * x as f32 / (width - 1) as f32;
                pixels.push([v, v, v]);
            }
        }
        Layer::new(width, height, pixels).unwrap()
    }

    fn luminance_spread(layer: &Layer) -> f32 {
        let (min, max) = layer
            .pixels()
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), px| (lo.min(px[1]), hi.max(px[1])));
        max - min
    }

    #[test]
    fn test_clip_histogram_preserves_total() {
        let mut hist = [0u32; BINS];
        hist[10] = 900;
        hist[200] = 124;
        let total: u32 = hist.iter().sum();
        clip_histogram(&mut hist, 16);
        assert_eq!(hist.iter().sum::<u32>(), total);
        assert!(hist.iter().all(|&c| c <= 16 + total / BINS as u32 + 1));
    }

    #[test]
    fn test_clip_threshold_never_zero() {
        assert_eq!(clip_threshold(0.01, 4), 1);
        assert_eq!(clip_threshold(2.0, 64 * 64), 32);
    }

    #[test]
    fn test_lut_ends_at_one() {
        let mut hist = [0u32; BINS];
        hist[0] = 5;
        hist[255] = 5;
        let lut = build_lut(&hist, 10);
        assert!((lut[0] - 0.5).abs() < 1e-6);
        assert!((lut[255] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_neighbour_tiles_clamp_at_edges() {
        assert_eq!(neighbour_tiles(0, 10.0, 4).0, 0);
        let (a, b, _) = neighbour_tiles(39, 10.0, 4);
        assert_eq!((a, b), (3, 3));
        let (a, b, f) = neighbour_tiles(10, 10.0, 4);
        assert_eq!((a, b), (0, 1));
        assert!((f - 0.55).abs() < 1e-5);
    }

    #[test]
    fn test_adaptive_contrast_preserves_dimensions_and_range() {
        let layer = gradient(37, 23, 0.2, 0.4);
        for clip in [2.0, 3.0, 4.0] {
            let out = adaptive_contrast(&layer, clip, DEFAULT_TILE_GRID);
            assert_eq!(out.dimensions(), layer.dimensions());
            assert!(
                out.pixels()
                    .iter()
                    .all(|px| px.iter().all(|c| (0.0..=1.0).contains(c)))
            );
        }
    }

    #[test]
    fn test_adaptive_contrast_keeps_gray_neutral() {
        let layer = gradient(32, 32, 0.1, 0.9);
        let out = adaptive_contrast(&layer, 2.0, DEFAULT_TILE_GRID);
        for px in out.pixels() {
            assert!((px[0] - px[1]).abs() < EPSILON, "{px:?}");
            assert!((px[1] - px[2]).abs() < EPSILON, "{px:?}");
        }
    }

    #[test]
    fn test_adaptive_contrast_stretches_low_contrast_input() {
        let layer = gradient(64, 16, 0.4, 0.5);
        let out = adaptive_contrast(&layer, 4.0, (1, 1));
        assert!(
            luminance_spread(&out) > luminance_spread(&layer),
            "equalization should widen a narrow tonal range"
        );
    }

    #[test]
    fn test_adaptive_contrast_handles_grid_larger_than_image() {
        let layer = gradient(3, 2, 0.0, 1.0);
        let out = adaptive_contrast(&layer, 2.0, (8, 8));
        assert_eq!(out.dimensions(), (3, 2));
    }
}
