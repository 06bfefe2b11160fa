//! Masterchain CLI
//!
//! Command-line interface for the masterchain effect pipeline.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use masterchain::cli::commands;
use masterchain::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Masterchain v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Masterchain v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Process {
            input,
            settings,
            output,
            strict,
        } => commands::process(&input, settings.as_deref(), &output, strict)
            .with_context(|| format!("failed to process {}", input.display())),
        Commands::Tone {
            frequency,
            amplitude,
            duration,
            sample_rate,
            stereo,
            output,
        } => commands::tone(frequency, amplitude, duration, sample_rate, stereo, &output)
            .with_context(|| format!("failed to write tone to {}", output.display())),
        Commands::Detect { input } => commands::detect_processed(&input)
            .with_context(|| format!("failed to analyze {}", input.display())),
        Commands::Settings { all } => {
            commands::print_settings(all).context("failed to print settings")
        }
    }
}
