//! GDF Demo: preset enhancement viewer and inspection harness.
//!
//! Image work runs on a background worker thread; the foreground keeps the
//! viewer state and blends original and processed layers at the slider
//! position.

mod cli;
mod commands;
mod config;
mod error;
mod messages;
mod viewer;
mod worker;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::AppError;

fn main() -> Result<(), AppError> {
    let config = AppConfig::default();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "GDF demo starting");

    let result = handle_command(&config, cli.command);
    if let Err(err) = &result {
        tracing::error!(%err, "command failed");
    }
    result
}

fn handle_command(config: &AppConfig, command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Presets => {
            commands::list_presets();
            Ok(())
        }
        Commands::Process {
            input,
            preset,
            alpha,
            output,
        } => {
            let written = commands::process(config, &input, &preset, alpha, output)?;
            println!("{}", written.display());
            Ok(())
        }
        Commands::Inspect {
            input,
            out_dir,
            json,
        } => {
            let reports = commands::inspect(config, &input, out_dir)?;
            println!("{}", commands::format_report(&reports, json)?);
            Ok(())
        }
    }
}
