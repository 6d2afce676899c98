//! Summary statistics over a layer.

use serde::{Deserialize, Serialize};

use crate::layer::Layer;

/// Mean, minimum and maximum over every channel of every pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStats {
    pub mean: f32,
    pub min: f32,
    pub max: f32,
}

impl LayerStats {
    /// Compute statistics for `layer`. An empty layer reports all zeros.
    pub fn compute(layer: &Layer) -> Self {
        if layer.is_empty() {
            return Self {
                mean: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let mut sum = 0.0_f64;
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for px in layer.pixels() {
            for &c in px {
                sum += c as f64;
                min = min.min(c);
                max = max.max(c);
            }
        }
        let count = (layer.pixels().len() * 3) as f64;

        Self {
            mean: (sum / count) as f32,
            min,
            max,
        }
    }
}
