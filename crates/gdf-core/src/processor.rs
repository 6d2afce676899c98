//! Stateful pipeline holding the original and processed layers.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::PipelineError;
use crate::layer::Layer;
use crate::loader;
use crate::preset::Preset;

/// Owns the two layers of the comparison view.
///
/// The original is set once per load and never modified. The processed layer
/// starts as the original and is replaced wholesale on every preset
/// application; presets always run against the original, never stack. Both
/// are reference counted so a snapshot can be handed to another thread
/// without copying pixels.
#[derive(Debug, Default)]
pub struct ImageProcessor {
    original: Option<Arc<Layer>>,
    processed: Option<Arc<Layer>>,
    current_preset: Option<Preset>,
}

impl ImageProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path` and make it the new original.
    ///
    /// On failure the previously loaded layers are kept.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        let layer = loader::load(path)?;
        info!(width = layer.width(), height = layer.height(), "image loaded");
        self.set_original(layer);
        Ok(())
    }

    /// Replace both layers with `layer`, dropping any previous image.
    pub fn set_original(&mut self, layer: Layer) {
        let original = Arc::new(layer);
        self.processed = Some(Arc::clone(&original));
        self.original = Some(original);
        self.current_preset = None;
    }

    /// Run `preset` on the original and store the result as the processed layer.
    #[instrument(skip_all, fields(preset = %preset))]
    pub fn apply_preset(&mut self, preset: Preset) -> Result<&Arc<Layer>, PipelineError> {
        let original = self.original.as_ref().ok_or(PipelineError::NoImageLoaded)?;
        let result = Arc::new(preset.apply(original));
        info!("preset applied");

        self.current_preset = Some(preset);
        Ok(&*self.processed.insert(result))
    }

    /// Look up a preset by name and apply it.
    ///
    /// An unknown name logs a warning, leaves all state unchanged and returns
    /// `Ok(None)`.
    pub fn apply_preset_named(
        &mut self,
        name: &str,
    ) -> Result<Option<&Arc<Layer>>, PipelineError> {
        match name.parse::<Preset>() {
            Ok(preset) => self.apply_preset(preset).map(Some),
            Err(_) => {
                warn!(name, "unknown preset");
                Ok(None)
            }
        }
    }

    pub fn original(&self) -> Option<&Arc<Layer>> {
        self.original.as_ref()
    }

    pub fn processed(&self) -> Option<&Arc<Layer>> {
        self.processed.as_ref()
    }

    /// The preset that produced the current processed layer, if any.
    pub fn current_preset(&self) -> Option<Preset> {
        self.current_preset
    }

    /// Dimensions of the loaded image.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.original.as_ref().map(|layer| layer.dimensions())
    }
}
