//! Background pipeline worker.
//!
//! The worker owns the `ImageProcessor` on a dedicated thread and runs one
//! job at a time. The foreground submits `WorkerCommand`s and later picks up
//! `WorkerEvent`s, either by polling from its refresh loop or by blocking.
//! Jobs are not cancellable and have no timeout.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use gdf_core::{ImageProcessor, PipelineError};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::messages::{WorkerCommand, WorkerEvent};

/// Handle to the background worker thread.
///
/// Dropping the handle asks the worker to stop and joins its thread.
pub struct PipelineWorker {
    commands: mpsc::UnboundedSender<WorkerCommand>,
    events: mpsc::UnboundedReceiver<WorkerEvent>,
    handle: Option<JoinHandle<()>>,
}

impl PipelineWorker {
    /// Spawn the worker thread with an empty processor.
    pub fn spawn() -> Result<Self, AppError> {
        let (command_tx, command_rx) = mpsc::unbounded_channel::<WorkerCommand>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<WorkerEvent>();

        let handle = std::thread::Builder::new()
            .name("gdf-worker".into())
            .spawn(move || run(command_rx, event_tx))?;
        info!("pipeline worker started");

        Ok(Self {
            commands: command_tx,
            events: event_rx,
            handle: Some(handle),
        })
    }

    /// Queue a command for the worker.
    pub fn send(&self, command: WorkerCommand) -> Result<(), AppError> {
        self.commands
            .send(command)
            .map_err(|_| AppError::WorkerDisconnected)
    }

    pub fn load_image(&self, path: impl Into<PathBuf>) -> Result<(), AppError> {
        self.send(WorkerCommand::LoadImage { path: path.into() })
    }

    pub fn apply_preset(&self, name: impl Into<String>) -> Result<(), AppError> {
        self.send(WorkerCommand::ApplyPreset { name: name.into() })
    }

    /// Next completed event, if one is ready. Never blocks.
    pub fn try_next_event(&mut self) -> Option<WorkerEvent> {
        self.events.try_recv().ok()
    }

    /// Block until the next event arrives.
    ///
    /// Must not be called from inside an async runtime.
    pub fn wait_event(&mut self) -> Result<WorkerEvent, AppError> {
        self.events
            .blocking_recv()
            .ok_or(AppError::WorkerDisconnected)
    }
}

impl Drop for PipelineWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            error!("pipeline worker thread panicked during shutdown");
        }
    }
}

/// Worker loop. Exits on `Shutdown`, when the command channel closes, or when
/// nobody is listening for events any more.
fn run(
    mut commands: mpsc::UnboundedReceiver<WorkerCommand>,
    events: mpsc::UnboundedSender<WorkerEvent>,
) {
    let mut processor = ImageProcessor::new();

    while let Some(command) = commands.blocking_recv() {
        debug!(?command, "worker job");
        let event = match command {
            WorkerCommand::Shutdown => break,
            WorkerCommand::LoadImage { path } => execute(|| load(&mut processor, path)),
            WorkerCommand::ApplyPreset { name } => execute(|| apply(&mut processor, name)),
        };
        if events.send(event).is_err() {
            break;
        }
    }
    debug!("pipeline worker stopped");
}

/// Run a job, turning errors and panics into a `Failed` event.
fn execute(job: impl FnOnce() -> Result<WorkerEvent, PipelineError>) -> WorkerEvent {
    match panic::catch_unwind(AssertUnwindSafe(job)) {
        Ok(Ok(event)) => event,
        Ok(Err(err)) => {
            error!(%err, "worker job failed");
            WorkerEvent::Failed {
                message: err.to_string(),
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(%message, "worker job panicked");
            WorkerEvent::Failed { message }
        }
    }
}

fn load(processor: &mut ImageProcessor, path: PathBuf) -> Result<WorkerEvent, PipelineError> {
    processor.load_image(&path)?;
    let original = processor
        .original()
        .cloned()
        .ok_or(PipelineError::NoImageLoaded)?;
    let processed = processor
        .processed()
        .cloned()
        .ok_or(PipelineError::NoImageLoaded)?;
    Ok(WorkerEvent::ImageLoaded {
        path,
        original,
        processed,
    })
}

fn apply(processor: &mut ImageProcessor, name: String) -> Result<WorkerEvent, PipelineError> {
    let processed = match processor.apply_preset_named(&name)? {
        Some(layer) => Arc::clone(layer),
        None => return Ok(WorkerEvent::PresetIgnored { name }),
    };
    let preset = processor
        .current_preset()
        .ok_or(PipelineError::NoImageLoaded)?;
    Ok(WorkerEvent::PresetApplied { preset, processed })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("internal error: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("internal error: {s}")
    } else {
        "internal error".to_string()
    }
}
