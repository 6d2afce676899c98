//! Layer representation for the enhancement pipeline.

use image::{Rgb32FImage, RgbImage};

use crate::error::PipelineError;

/// Dense RGB image buffer. Every channel is a normalized `f32` in `[0, 1]`.
///
/// Pixels are stored row-major, `width * height` entries. All constructors
/// clamp their input, so a `Layer` never holds values outside the unit range.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl Layer {
    /// Build a layer from row-major pixels, clamping every channel.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> Result<Self, PipelineError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(PipelineError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self::from_pixels(width, height, pixels))
    }

    /// A layer where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgb: [f32; 3]) -> Self {
        let pixels = vec![rgb; width as usize * height as usize];
        Self::from_pixels(width, height, pixels)
    }

    /// Convert a decoded float image, clamping into the unit range.
    pub fn from_rgb32f(image: &Rgb32FImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = bytemuck::cast_slice::<f32, [f32; 3]>(image.as_raw().as_slice());
        Self::from_pixels(width, height, pixels.to_vec())
    }

    /// Caller guarantees `pixels.len() == width * height`.
    pub(crate) fn from_pixels(width: u32, height: u32, mut pixels: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        for px in &mut pixels {
            *px = clamp_rgb(*px);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[[f32; 3]] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Apply `f` to every pixel, producing a new clamped layer of the same size.
    pub fn map_pixels(&self, f: impl Fn([f32; 3]) -> [f32; 3]) -> Self {
        let pixels = self.pixels.iter().map(|&px| f(px)).collect();
        Self::from_pixels(self.width, self.height, pixels)
    }

    /// Combine two layers of equal size pixel by pixel.
    pub fn zip_map(
        &self,
        other: &Layer,
        f: impl Fn([f32; 3], [f32; 3]) -> [f32; 3],
    ) -> Result<Self, PipelineError> {
        if self.dimensions() != other.dimensions() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        let pixels = self
            .pixels
            .iter()
            .zip(&other.pixels)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self::from_pixels(self.width, self.height, pixels))
    }

    /// Float image view for `image`/`imageproc` operations.
    pub fn to_rgb32f(&self) -> Rgb32FImage {
        let raw = bytemuck::cast_slice::<[f32; 3], f32>(self.pixels.as_slice()).to_vec();
        Rgb32FImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| Rgb32FImage::new(self.width, self.height))
    }

    /// 8-bit RGB buffer suitable for display or encoding.
    pub fn to_rgb8(&self) -> RgbImage {
        let raw: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|px| px.map(|c| (c * 255.0).round() as u8))
            .collect();
        RgbImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }
}

/// Clamp a channel into `[0, 1]`. NaN maps to 0.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[inline]
fn clamp_rgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(clamp_unit)
}
