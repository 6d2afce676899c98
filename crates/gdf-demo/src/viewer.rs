//! Foreground viewer state: the comparison slider and the display buffer.

use std::sync::Arc;

use gdf_core::{Layer, PipelineError, Preset, blend};
use image::RgbImage;
use tracing::{info, warn};

use crate::messages::WorkerEvent;
use crate::worker::PipelineWorker;

/// State the display reads from.
///
/// Layers are only replaced from completed `WorkerEvent`s, never written in
/// place. `dirty` is set whenever something visible changed and cleared by
/// [`Viewer::display_image`].
#[derive(Debug)]
pub struct Viewer {
    original: Option<Arc<Layer>>,
    processed: Option<Arc<Layer>>,
    preset: Option<Preset>,
    alpha: f32,
    status: String,
    last_error: Option<String>,
    dirty: bool,
}

impl Viewer {
    /// Empty viewer with the slider at `alpha`.
    pub fn new(alpha: f32) -> Self {
        Self {
            original: None,
            processed: None,
            preset: None,
            alpha: clamp_alpha(alpha),
            status: "No image loaded".to_string(),
            last_error: None,
            dirty: false,
        }
    }

    /// Apply a completion event from the worker.
    pub fn handle_event(&mut self, event: WorkerEvent) {
        self.status = event.status_message();
        if !matches!(event, WorkerEvent::Failed { .. }) {
            self.last_error = None;
        }
        match event {
            WorkerEvent::ImageLoaded {
                original,
                processed,
                ..
            } => {
                self.original = Some(original);
                self.processed = Some(processed);
                self.preset = None;
                self.dirty = true;
            }
            WorkerEvent::PresetApplied { preset, processed } => {
                self.processed = Some(processed);
                self.preset = Some(preset);
                self.dirty = true;
            }
            WorkerEvent::PresetIgnored { .. } => {}
            WorkerEvent::Failed { message } => {
                warn!(status = %self.status, "worker reported failure");
                self.last_error.get_or_insert(message);
            }
        }
        info!(status = %self.status, "viewer updated");
    }

    /// Drain every event the worker has finished, without blocking.
    ///
    /// Returns how many events were applied.
    pub fn poll(&mut self, worker: &mut PipelineWorker) -> usize {
        let mut applied = 0;
        while let Some(event) = worker.try_next_event() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Move the comparison slider. 0 shows the original, 1 the processed layer.
    pub fn set_alpha(&mut self, alpha: f32) {
        let alpha = clamp_alpha(alpha);
        if alpha != self.alpha {
            self.alpha = alpha;
            self.dirty = true;
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn preset(&self) -> Option<Preset> {
        self.preset
    }

    /// First failure reported since the last successful event.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn original(&self) -> Option<&Arc<Layer>> {
        self.original.as_ref()
    }

    pub fn processed(&self) -> Option<&Arc<Layer>> {
        self.processed.as_ref()
    }

    /// Blend of original and processed at the current slider position.
    pub fn display_layer(&self) -> Result<Option<Layer>, PipelineError> {
        match (&self.original, &self.processed) {
            (Some(original), Some(processed)) => blend(original, processed, self.alpha).map(Some),
            _ => Ok(None),
        }
    }

    /// Produce the 8-bit display buffer and clear the dirty flag.
    ///
    /// `Ok(None)` before any image has been loaded.
    pub fn display_image(&mut self) -> Result<Option<RgbImage>, PipelineError> {
        let image = self.display_layer()?.map(|layer| layer.to_rgb8());
        self.dirty = false;
        Ok(image)
    }
}

fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn loaded_event(layer: Layer) -> WorkerEvent {
        let layer = Arc::new(layer);
        WorkerEvent::ImageLoaded {
            path: PathBuf::from("frame.png"),
            original: Arc::clone(&layer),
            processed: layer,
        }
    }

    fn gradient() -> Layer {
        let pixels = (0..16).map(|i| [i as f32 / 15.0, 0.5, 1.0 - i as f32 / 15.0]).collect();
        Layer::new(4, 4, pixels).unwrap()
    }

    #[test]
    fn test_display_before_load_is_none() {
        let mut viewer = Viewer::new(0.5);
        assert!(viewer.display_image().unwrap().is_none());
        assert_eq!(viewer.status(), "No image loaded");
    }

    #[test]
    fn test_alpha_endpoints_show_each_layer() {
        let original = gradient();
        let processed = Preset::HullScanner.apply(&original);

        let mut viewer = Viewer::new(0.0);
        viewer.handle_event(loaded_event(original.clone()));
        viewer.handle_event(WorkerEvent::PresetApplied {
            preset: Preset::HullScanner,
            processed: Arc::new(processed.clone()),
        });

        assert_eq!(viewer.display_layer().unwrap().unwrap(), original);
        viewer.set_alpha(1.0);
        assert_eq!(viewer.display_layer().unwrap().unwrap(), processed);
        assert_eq!(viewer.preset(), Some(Preset::HullScanner));
        assert_eq!(viewer.status(), "Applied HULL_SCANNER");
    }

    #[test]
    fn test_ignored_preset_keeps_processed_layer() {
        let mut viewer = Viewer::new(1.0);
        viewer.handle_event(loaded_event(gradient()));
        viewer.handle_event(WorkerEvent::PresetApplied {
            preset: Preset::VoidHunter,
            processed: Arc::new(Layer::filled(4, 4, [0.3; 3])),
        });
        let before = viewer.processed().cloned();

        viewer.handle_event(WorkerEvent::PresetIgnored { name: "BOGUS".into() });
        assert_eq!(viewer.processed().cloned(), before);
        assert_eq!(viewer.preset(), Some(Preset::VoidHunter));
        assert_eq!(viewer.status(), "Unknown preset: BOGUS");
    }

    #[test]
    fn test_failure_keeps_layers_and_sets_status() {
        let mut viewer = Viewer::new(1.0);
        viewer.handle_event(loaded_event(gradient()));
        viewer.display_image().unwrap();

        viewer.handle_event(WorkerEvent::Failed { message: "disk on fire".into() });
        assert!(viewer.original().is_some());
        assert!(!viewer.is_dirty());
        assert_eq!(viewer.status(), "Error: disk on fire");
        assert_eq!(viewer.last_error(), Some("disk on fire"));

        viewer.handle_event(WorkerEvent::PresetApplied {
            preset: Preset::WakeMapper,
            processed: Arc::new(gradient()),
        });
        assert_eq!(viewer.last_error(), None);
    }

    #[test]
    fn test_new_load_resets_preset() {
        let mut viewer = Viewer::new(1.0);
        viewer.handle_event(loaded_event(gradient()));
        viewer.handle_event(WorkerEvent::PresetApplied {
            preset: Preset::WakeMapper,
            processed: Arc::new(Layer::filled(4, 4, [0.5; 3])),
        });
        viewer.handle_event(loaded_event(Layer::filled(2, 2, [0.1; 3])));

        assert_eq!(viewer.preset(), None);
        let image = viewer.display_image().unwrap().unwrap();
        assert_eq!(image.dimensions(), (2, 2));
    }

    #[test]
    fn test_poll_drains_worker_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        image::RgbImage::from_pixel(6, 4, image::Rgb([40, 80, 120]))
            .save(&path)
            .unwrap();

        let mut worker = PipelineWorker::spawn().unwrap();
        let mut viewer = Viewer::new(1.0);
        worker.load_image(&path).unwrap();
        worker.apply_preset("WAKE_MAPPER").unwrap();

        let mut applied = 0;
        while applied < 2 {
            applied += match viewer.poll(&mut worker) {
                0 => {
                    viewer.handle_event(worker.wait_event().unwrap());
                    1
                }
                n => n,
            };
        }
        assert_eq!(viewer.preset(), Some(Preset::WakeMapper));
        assert!(viewer.is_dirty());
        assert_eq!(viewer.original().unwrap().dimensions(), (6, 4));
    }

    #[test]
    fn test_slider_marks_dirty_only_on_change() {
        let mut viewer = Viewer::new(0.5);
        viewer.set_alpha(0.5);
        assert!(!viewer.is_dirty());
        viewer.set_alpha(3.0);
        assert!(viewer.is_dirty());
        assert_eq!(viewer.alpha(), 1.0);
    }
}
