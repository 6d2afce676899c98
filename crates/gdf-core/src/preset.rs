//! Fixed enhancement presets composed from the filter modules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::filters::{DEFAULT_TILE_GRID, adaptive_contrast, high_pass, log_stretch};
use crate::layer::Layer;

/// A single filter invocation with fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum FilterStep {
    /// Logarithmic tone curve.
    LogStretch { strength: f32 },
    /// CLAHE on luminance.
    AdaptiveContrast {
        clip_limit: f32,
        tile_grid: (u32, u32),
    },
    /// Blur-and-invert detail map.
    HighPass { kernel_size: u32 },
}

impl FilterStep {
    /// Run this step on `layer`.
    pub fn apply(&self, layer: &Layer) -> Layer {
        match *self {
            Self::LogStretch { strength } => log_stretch(layer, strength),
            Self::AdaptiveContrast {
                clip_limit,
                tile_grid,
            } => adaptive_contrast(layer, clip_limit, tile_grid),
            Self::HighPass { kernel_size } => high_pass(layer, kernel_size),
        }
    }
}

impl fmt::Display for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogStretch { strength } => write!(f, "log stretch (strength {strength})"),
            Self::AdaptiveContrast {
                clip_limit,
                tile_grid: (cols, rows),
            } => write!(f, "adaptive contrast (clip {clip_limit}, {cols}x{rows} tiles)"),
            Self::HighPass { kernel_size } => write!(f, "high pass (kernel {kernel_size})"),
        }
    }
}

const VOID_HUNTER_STEPS: [FilterStep; 2] = [
    FilterStep::LogStretch { strength: 50.0 },
    FilterStep::AdaptiveContrast {
        clip_limit: 4.0,
        tile_grid: DEFAULT_TILE_GRID,
    },
];

const HULL_SCANNER_STEPS: [FilterStep; 2] = [
    FilterStep::AdaptiveContrast {
        clip_limit: 2.0,
        tile_grid: DEFAULT_TILE_GRID,
    },
    FilterStep::HighPass { kernel_size: 31 },
];

const WAKE_MAPPER_STEPS: [FilterStep; 3] = [
    FilterStep::LogStretch { strength: 10.0 },
    FilterStep::HighPass { kernel_size: 51 },
    FilterStep::AdaptiveContrast {
        clip_limit: 3.0,
        tile_grid: DEFAULT_TILE_GRID,
    },
];

/// The closed set of enhancement presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Preset {
    /// Dig into the darks: strong log stretch, then strong CLAHE.
    VoidHunter,
    /// Surface structure: mild CLAHE, then a mid-size high pass.
    HullScanner,
    /// Broad density patterns: mild log stretch, wide high pass, CLAHE.
    WakeMapper,
}

impl Preset {
    /// Canonical identifier, as accepted by [`Preset::from_str`].
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VoidHunter => "VOID_HUNTER",
            Self::HullScanner => "HULL_SCANNER",
            Self::WakeMapper => "WAKE_MAPPER",
        }
    }

    /// Human-readable purpose for menus and status text.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::VoidHunter => "Deep space object analysis",
            Self::HullScanner => "Structural anomaly detection",
            Self::WakeMapper => "Propulsion trail visualization",
        }
    }

    /// Filter sequence, applied in order.
    pub const fn steps(&self) -> &'static [FilterStep] {
        match self {
            Self::VoidHunter => &VOID_HUNTER_STEPS,
            Self::HullScanner => &HULL_SCANNER_STEPS,
            Self::WakeMapper => &WAKE_MAPPER_STEPS,
        }
    }

    pub fn all() -> &'static [Self] {
        const ALL: [Preset; 3] = [Preset::VoidHunter, Preset::HullScanner, Preset::WakeMapper];
        &ALL
    }

    /// Run the full filter sequence on `layer`.
    pub fn apply(&self, layer: &Layer) -> Layer {
        debug!(preset = self.name(), "applying preset");
        self.steps()
            .iter()
            .fold(layer.clone(), |current, step| step.apply(&current))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = PipelineError;

    /// Case-insensitive; `-` and spaces are accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| PipelineError::UnknownPreset(s.to_string()))
    }
}

/// Apply the preset called `name` to `layer`.
///
/// Unknown names are not an error: a warning is logged and the input is
/// returned unchanged.
pub fn apply_preset(layer: &Layer, name: &str) -> Layer {
    match name.parse::<Preset>() {
        Ok(preset) => preset.apply(layer),
        Err(_) => {
            warn!(name, "unknown preset");
            layer.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_layer() -> Layer {
        let (width, height) = (24, 18);
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let r = x as f32 / (width - 1) as f32;
                let g = y as f32 / (height - 1) as f32;
                let b = if (x / 4 + y / 4) % 2 == 0 { 0.1 } else { 0.7 };
                pixels.push([r, g, b]);
            }
        }
        Layer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_parse_canonical_and_loose_names() {
        assert_eq!("VOID_HUNTER".parse::<Preset>().unwrap(), Preset::VoidHunter);
        assert_eq!("hull-scanner".parse::<Preset>().unwrap(), Preset::HullScanner);
        assert_eq!(" wake mapper ".parse::<Preset>().unwrap(), Preset::WakeMapper);
        assert!(matches!(
            "SUN_DIVER".parse::<Preset>(),
            Err(PipelineError::UnknownPreset(name)) if name == "SUN_DIVER"
        ));
    }

    #[test]
    fn test_name_roundtrips_through_display() {
        for preset in Preset::all() {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), *preset);
        }
    }

    #[test]
    fn test_step_sequences_match_table() {
        assert_eq!(
            Preset::VoidHunter.steps(),
            &[
                FilterStep::LogStretch { strength: 50.0 },
                FilterStep::AdaptiveContrast { clip_limit: 4.0, tile_grid: (8, 8) },
            ]
        );
        assert_eq!(
            Preset::HullScanner.steps(),
            &[
                FilterStep::AdaptiveContrast { clip_limit: 2.0, tile_grid: (8, 8) },
                FilterStep::HighPass { kernel_size: 31 },
            ]
        );
        assert_eq!(
            Preset::WakeMapper.steps(),
            &[
                FilterStep::LogStretch { strength: 10.0 },
                FilterStep::HighPass { kernel_size: 51 },
                FilterStep::AdaptiveContrast { clip_limit: 3.0, tile_grid: (8, 8) },
            ]
        );
    }

    #[test]
    fn test_every_preset_preserves_dimensions_and_range() {
        let layer = test_layer();
        for preset in Preset::all() {
            let out = preset.apply(&layer);
            assert_eq!(out.dimensions(), layer.dimensions(), "{preset}");
            assert!(
                out.pixels()
                    .iter()
                    .all(|px| px.iter().all(|c| (0.0..=1.0).contains(c))),
                "{preset} produced values outside [0, 1]"
            );
        }
    }

    #[test]
    fn test_apply_preset_by_name_matches_typed_apply() {
        let layer = test_layer();
        assert_eq!(apply_preset(&layer, "VOID_HUNTER"), Preset::VoidHunter.apply(&layer));
    }

    #[test]
    fn test_unknown_preset_is_noop() {
        let layer = test_layer();
        assert_eq!(apply_preset(&layer, "NOT_A_PRESET"), layer);
    }
}
