//! Application configuration for the demo.

use std::path::PathBuf;

/// Default directory for rendered output.
const DEFAULT_OUTPUT_DIR: &str = ".";
/// Default slider position: fully processed.
const DEFAULT_BLEND_ALPHA: f32 = 1.0;
/// Default tracing filter when `RUST_LOG` is unset.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration for the GDF demo application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory rendered images are written to.
    pub output_dir: PathBuf,
    /// Initial comparison slider position in `[0, 1]`.
    pub blend_alpha: f32,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl AppConfig {
    /// Build a configuration from a variable lookup.
    ///
    /// Reads `GDF_OUTPUT_DIR`, `GDF_BLEND_ALPHA` and `GDF_LOG`. Missing or
    /// unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            output_dir: lookup("GDF_OUTPUT_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            blend_alpha: lookup("GDF_BLEND_ALPHA")
                .and_then(|s| s.trim().parse::<f32>().ok())
                .filter(|a| a.is_finite())
                .map(|a| a.clamp(0.0, 1.0))
                .unwrap_or(DEFAULT_BLEND_ALPHA),
            log_level: lookup("GDF_LOG")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}
