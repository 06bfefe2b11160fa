//! CLI Module
//!
//! Command-line interface for the masterchain effect pipeline.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Masterchain - batch mastering for PCM audio buffers
#[derive(Parser, Debug)]
#[command(name = "masterchain")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the effect chain over a buffer
    #[command(name = "process")]
    Process {
        /// Input buffer (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Effect settings (JSON); all effects disabled when omitted
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Render document to write
        #[arg(short, long)]
        output: PathBuf,

        /// Reject out-of-range parameters instead of clamping them
        #[arg(long)]
        strict: bool,
    },

    /// Write a sine test buffer
    #[command(name = "tone")]
    Tone {
        /// Frequency in Hz
        #[arg(short, long, default_value_t = 440.0)]
        frequency: f32,

        /// Peak amplitude (linear)
        #[arg(short, long, default_value_t = 0.5)]
        amplitude: f32,

        /// Duration in seconds
        #[arg(short, long, default_value_t = 1.0)]
        duration: f32,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Write both channels
        #[arg(long)]
        stereo: bool,

        /// Buffer file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run the already-processed detector on a buffer
    #[command(name = "detect")]
    Detect {
        /// Input buffer (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print a settings template
    #[command(name = "settings")]
    Settings {
        /// Enable every effect in the template
        #[arg(long)]
        all: bool,
    },
}
