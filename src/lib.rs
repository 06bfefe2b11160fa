//! Masterchain - Batch Mastering Effect Pipeline
//!
//! Applies a fixed sequence of DSP stages to a PCM buffer and returns the
//! processed buffer together with a report of what ran.
//!
//! # Architecture
//!
//! - `engine`: the buffer type, level measurements and JSON I/O
//! - `dsp`: primitive filters, every effect stage, and the chain
//! - `settings`: the per-effect configuration record
//! - `report`: what a chain run produced
//!
//! ```no_run
//! use masterchain::{process, AudioBuffer, EffectSettings};
//!
//! let input = AudioBuffer::sine(440.0, 0.5, 1.0, 44100);
//! let mut settings = EffectSettings::default();
//! settings.compressor.enabled = true;
//! let result = process(&input, &settings);
//! println!("{}", result.report.to_text());
//! ```

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod report;
pub mod settings;

pub use dsp::{process, MasteringChain};
pub use engine::AudioBuffer;
pub use error::{MasterError, Result};
pub use report::{AppliedEffect, ProcessingReport, ProcessingResult};
pub use settings::EffectSettings;
