//! Command implementations. Each drives the worker and viewer the same way an
//! interactive front end would: submit a job, wait for its completion event,
//! then refresh the display from the viewer.

use std::path::{Path, PathBuf};

use gdf_core::{LayerStats, PipelineError, Preset};
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::viewer::Viewer;
use crate::worker::PipelineWorker;

/// One row of the `inspect` report.
#[derive(Debug, Clone, Serialize)]
pub struct PresetReport {
    pub preset: Preset,
    pub description: &'static str,
    pub width: u32,
    pub height: u32,
    pub stats: LayerStats,
    pub output: PathBuf,
}

/// Print the preset table.
pub fn list_presets() {
    for preset in Preset::all() {
        println!("{:<14} {}", preset.name(), preset.description());
        for step in preset.steps() {
            println!("{:<14}   - {step}", "");
        }
    }
}

/// Load `input`, apply `preset_name`, blend at `alpha`, write the display image.
pub fn process(
    config: &AppConfig,
    input: &Path,
    preset_name: &str,
    alpha: Option<f32>,
    output: Option<PathBuf>,
) -> Result<PathBuf, AppError> {
    let preset: Preset = preset_name.parse()?;
    let output = output.unwrap_or_else(|| default_output(config, input, preset));

    let mut worker = PipelineWorker::spawn()?;
    let mut viewer = Viewer::new(config.blend_alpha);
    if let Some(alpha) = alpha {
        viewer.set_alpha(alpha);
    }

    worker.load_image(input)?;
    worker.apply_preset(preset.name())?;
    settle(&mut worker, &mut viewer, 2)?;
    info!(
        status = viewer.status(),
        preset = ?viewer.preset(),
        dirty = viewer.is_dirty(),
        "pipeline settled"
    );

    let image = viewer.display_image()?.ok_or(PipelineError::NoImageLoaded)?;
    ensure_parent(&output)?;
    image.save(&output)?;
    info!(output = %output.display(), alpha = viewer.alpha(), "display image written");
    Ok(output)
}

/// Apply every preset to `input`, writing each result and collecting stats.
pub fn inspect(
    config: &AppConfig,
    input: &Path,
    out_dir: Option<PathBuf>,
) -> Result<Vec<PresetReport>, AppError> {
    let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());
    std::fs::create_dir_all(&out_dir)?;

    let mut worker = PipelineWorker::spawn()?;
    // Reports describe preset output, so the slider stays fully processed.
    let mut viewer = Viewer::new(1.0);

    worker.load_image(input)?;
    settle(&mut worker, &mut viewer, 1)?;
    let (width, height) = viewer
        .original()
        .ok_or(PipelineError::NoImageLoaded)?
        .dimensions();

    let mut reports = Vec::with_capacity(Preset::all().len());
    for preset in Preset::all() {
        worker.apply_preset(preset.name())?;
        settle(&mut worker, &mut viewer, 1)?;
        if viewer.preset() != Some(*preset) {
            return Err(PipelineError::UnknownPreset(preset.name().to_string()).into());
        }

        let processed = viewer.processed().ok_or(PipelineError::NoImageLoaded)?;
        let stats = LayerStats::compute(processed);

        let output = out_dir.join(format!("output_{}.jpg", preset.name()));
        processed.to_rgb8().save(&output)?;
        info!(preset = %preset, output = %output.display(), "preset output written");

        reports.push(PresetReport {
            preset: *preset,
            description: preset.description(),
            width,
            height,
            stats,
            output,
        });
    }
    Ok(reports)
}

/// Render an `inspect` report as text or pretty JSON.
pub fn format_report(reports: &[PresetReport], json: bool) -> Result<String, AppError> {
    if json {
        return Ok(serde_json::to_string_pretty(reports)?);
    }
    let lines: Vec<String> = reports
        .iter()
        .map(|r| {
            format!(
                "{:<14} mean={:.3} max={:.3} min={:.3}  {}",
                r.preset.name(),
                r.stats.mean,
                r.stats.max,
                r.stats.min,
                r.output.display()
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Feed the viewer until `jobs` events have arrived, the way a refresh loop
/// would: drain whatever is ready, block only when nothing is.
///
/// Fails on the first job the worker reports as failed.
fn settle(worker: &mut PipelineWorker, viewer: &mut Viewer, jobs: usize) -> Result<(), AppError> {
    let mut seen = 0;
    while seen < jobs {
        seen += match viewer.poll(worker) {
            0 => {
                viewer.handle_event(worker.wait_event()?);
                1
            }
            n => n,
        };
        if let Some(message) = viewer.last_error() {
            return Err(AppError::Worker(message.to_string()));
        }
    }
    Ok(())
}

fn default_output(config: &AppConfig, input: &Path, preset: Preset) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    config
        .output_dir
        .join(format!("{stem}_{}.png", preset.name()))
}

fn ensure_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
