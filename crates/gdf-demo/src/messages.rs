//! Message contracts between the foreground and the pipeline worker.
//!
//! Commands flow foreground → worker; events flow back once a job has fully
//! completed. Layer snapshots travel inside events as `Arc<Layer>`, so the
//! foreground only ever reads pixels the worker has finished writing.

use std::path::PathBuf;
use std::sync::Arc;

use gdf_core::{Layer, Preset};

/// Jobs for the background worker.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerCommand {
    /// Decode a new source image, replacing both layers.
    LoadImage {
        /// File path to the image.
        path: PathBuf,
    },

    /// Apply a preset by name to the loaded original.
    ApplyPreset {
        /// Preset identifier, e.g. `"VOID_HUNTER"`.
        name: String,
    },

    /// Stop the worker loop.
    Shutdown,
}

/// Completion signals from the background worker.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A new image was loaded successfully.
    ImageLoaded {
        /// File path of the loaded image.
        path: PathBuf,
        /// The freshly decoded original.
        original: Arc<Layer>,
        /// The processed layer, reset to the original.
        processed: Arc<Layer>,
    },

    /// A preset finished and replaced the processed layer.
    PresetApplied {
        /// The preset that ran.
        preset: Preset,
        /// The new processed layer.
        processed: Arc<Layer>,
    },

    /// The requested preset name is not known; nothing changed.
    PresetIgnored {
        /// The name as requested.
        name: String,
    },

    /// The job failed. Worker state is unchanged.
    Failed {
        /// Error description.
        message: String,
    },
}

impl WorkerEvent {
    /// Status line for display.
    pub fn status_message(&self) -> String {
        match self {
            Self::ImageLoaded { path, original, .. } => format!(
                "Loaded {} ({}x{})",
                path.display(),
                original.width(),
                original.height()
            ),
            Self::PresetApplied { preset, .. } => format!("Applied {preset}"),
            Self::PresetIgnored { name } => format!("Unknown preset: {name}"),
            Self::Failed { message } => format!("Error: {message}"),
        }
    }
}
