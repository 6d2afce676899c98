//! Image decoding into the pipeline's `Layer` format.

use std::path::Path;

use tracing::{debug, instrument};

use crate::error::PipelineError;
use crate::layer::Layer;

/// Load an image from disk and convert it to a normalized RGB `Layer`.
///
/// Supports the formats enabled in the `image` crate (PNG, JPEG, TIFF, BMP, ...).
/// Integer formats are scaled to `[0, 1]`; float formats are clamped into it.
/// Alpha is discarded.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<Layer, PipelineError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| PipelineError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(color = ?img.color(), "decoded image");

    let rgb = img.to_rgb32f();
    Ok(Layer::from_rgb32f(&rgb))
}
