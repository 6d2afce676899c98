use gdf_core::PipelineError;

/// Errors surfaced by the demo front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pipeline worker is no longer running")]
    WorkerDisconnected,
    #[error("{0}")]
    Worker(String),
}
