//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// GDF: photo enhancement presets with an original/processed blend slider.
#[derive(Parser, Debug)]
#[command(name = "gdf-demo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available presets
    Presets,

    /// Apply one preset and write the blended display image
    Process {
        /// Input image file
        input: PathBuf,

        /// Preset name, e.g. VOID_HUNTER
        #[arg(short, long)]
        preset: String,

        /// Slider position: 0 = original, 1 = processed (default from GDF_BLEND_ALPHA)
        #[arg(short, long)]
        alpha: Option<f32>,

        /// Output file (default: <output dir>/<input stem>_<PRESET>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run every preset, print statistics and write output_<PRESET>.jpg for each
    Inspect {
        /// Input image file
        input: PathBuf,

        /// Directory for rendered outputs (default from GDF_OUTPUT_DIR)
        #[arg(short = 'd', long)]
        out_dir: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process() {
        let cli = Cli::try_parse_from([
            "gdf-demo", "process", "in.jpg", "--preset", "WAKE_MAPPER", "--alpha", "0.4",
        ])
        .unwrap();
        match cli.command {
            Commands::Process {
                input,
                preset,
                alpha,
                output,
            } => {
                assert_eq!(input, PathBuf::from("in.jpg"));
                assert_eq!(preset, "WAKE_MAPPER");
                assert_eq!(alpha, Some(0.4));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_inspect_json() {
        let cli = Cli::try_parse_from(["gdf-demo", "inspect", "in.png", "-d", "out", "--json"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Inspect { json: true, .. }
        ));
    }
}
