use std::path::PathBuf;

/// Errors produced by the image pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to load image {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no image loaded")]
    NoImageLoaded,
    #[error("layer size mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}
