//! Delay Effect
//!
//! Single-tap delay built on a circular buffer. Each sample the delayed
//! value is read from the cursor slot, the *dry input* is written into the
//! same slot, and the cursor advances. Nothing recirculates, so there is
//! no feedback path.
//!
//! The `feedback` setting is accepted for compatibility with stored
//! settings documents but does not affect processing.

use serde::{Deserialize, Serialize};

use super::effect::{bound, clamp_or, ms_to_samples, Effect};
use crate::error::{MasterError, Result};

/// Longest supported delay
pub const MAX_DELAY_MS: f32 = 2000.0;

/// Delay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayParams {
    pub enabled: bool,
    /// Delay time in milliseconds (0-2000)
    pub delay_ms: f32,
    /// Wet share in percent (0-100); dry share is the remainder
    pub dry_wet: f32,
    /// Horizontal position (-50 to 50), gain = (x + 50) / 100
    pub position_x: f32,
    /// Vertical position (-50 to 50), gain = (y + 50) / 100
    pub position_y: f32,
    /// Legacy setting, ignored
    pub feedback: f32,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_ms: 250.0,
            dry_wet: 30.0,
            position_x: 50.0,
            position_y: 50.0,
            feedback: 0.0,
        }
    }
}

impl DelayParams {
    /// Validate parameters against their ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_DELAY_MS).contains(&self.delay_ms) {
            return Err(MasterError::invalid_parameter(
                "delay.delay_ms",
                self.delay_ms,
                "0 to 2000 ms",
            ));
        }
        if !(0.0..=100.0).contains(&self.dry_wet) {
            return Err(MasterError::invalid_parameter(
                "delay.dry_wet",
                self.dry_wet,
                "0 to 100 %",
            ));
        }
        for (name, value) in [
            ("delay.position_x", self.position_x),
            ("delay.position_y", self.position_y),
        ] {
            if !(-50.0..=50.0).contains(&value) {
                return Err(MasterError::invalid_parameter(name, value, "-50 to 50"));
            }
        }
        Ok(())
    }

    /// Clamp parameters to valid ranges
    pub fn clamp(&mut self) {
        let defaults = Self::default();
        self.delay_ms = clamp_or(self.delay_ms, 0.0, MAX_DELAY_MS, defaults.delay_ms);
        self.dry_wet = clamp_or(self.dry_wet, 0.0, 100.0, defaults.dry_wet);
        self.position_x = clamp_or(self.position_x, -50.0, 50.0, defaults.position_x);
        self.position_y = clamp_or(self.position_y, -50.0, 50.0, defaults.position_y);
        if !self.feedback.is_finite() {
            self.feedback = defaults.feedback;
        }
    }

    /// Delay length in samples (at least one)
    pub fn delay_samples(&self, sample_rate: u32) -> usize {
        ms_to_samples(self.delay_ms.clamp(0.0, MAX_DELAY_MS), sample_rate)
    }

    /// Combined positional gain
    pub fn position_gain(&self) -> f32 {
        let x = (self.position_x.clamp(-50.0, 50.0) + 50.0) / 100.0;
        let y = (self.position_y.clamp(-50.0, 50.0) + 50.0) / 100.0;
        x * y
    }
}

/// Fixed-length circular buffer
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    cursor: usize,
}

impl DelayLine {
    pub fn new(length: usize) -> Self {
        Self {
            buffer: vec![0.0; length.max(1)],
            cursor: 0,
        }
    }

    /// Read the delayed sample, overwrite the slot with `input`, advance
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.cursor];
        self.buffer[self.cursor] = input;
        self.cursor = (self.cursor + 1) % self.buffer.len();
        delayed
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn reset(&mut self) {
        self.buffer.iter_mut().for_each(|s| *s = 0.0);
        self.cursor = 0;
    }
}

/// Delay one channel
pub fn delay(samples: &[f32], sample_rate: u32, params: &DelayParams) -> Vec<f32> {
    let wet = params.dry_wet.clamp(0.0, 100.0) / 100.0;
    let dry = 1.0 - wet;
    let gain = params.position_gain();
    // a delay at or past the channel end only ever reads silence
    let mut line = DelayLine::new(params.delay_samples(sample_rate).min(samples.len()));

    samples
        .iter()
        .map(|&x| {
            let delayed = line.process_sample(x);
            bound((x * dry + delayed * wet) * gain)
        })
        .collect()
}

impl Effect for DelayParams {
    fn effect_type(&self) -> &'static str {
        "delay"
    }

    fn display_name(&self) -> &'static str {
        "Delay"
    }

    fn process_channel(&self, samples: &[f32], sample_rate: u32) -> Vec<f32> {
        delay(samples, sample_rate, self)
    }

    fn summary(&self) -> String {
        format!(
            "time {:.1} ms, mix {:.0}% wet, position ({:.0}, {:.0})",
            self.delay_ms, self.dry_wet, self.position_x, self.position_y
        )
    }
}
