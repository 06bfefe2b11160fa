//! Pitch shifter
//!
//! Resamples by the ratio between a target frequency and the 440 Hz
//! reference using Catmull-Rom interpolation. Output length always equals
//! input length: reading past the end zero-fills, reading short of the end
//! truncates.

use serde::{Deserialize, Serialize};

use super::effect::{bound, clamp_or, Effect};
use crate::error::{MasterError, Result};

/// Reference tuning frequency
pub const REFERENCE_HZ: f32 = 440.0;

/// Accepted target range (two octaves below to four above the reference)
pub const MIN_TARGET_HZ: f32 = 110.0;
pub const MAX_TARGET_HZ: f32 = 7040.0;

/// Pitch shifter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchShiftParams {
    pub enabled: bool,
    /// Frequency the 440 Hz reference should move to
    pub target_hz: f32,
}

impl Default for PitchShiftParams {
    fn default() -> Self {
        Self {
            enabled: false,
            target_hz: REFERENCE_HZ,
        }
    }
}

impl PitchShiftParams {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_TARGET_HZ..=MAX_TARGET_HZ).contains(&self.target_hz) {
            return Err(MasterError::invalid_parameter(
                "pitch_shift.target_hz",
                self.target_hz,
                "110 to 7040 Hz",
            ));
        }
        Ok(())
    }

    pub fn clamp(&mut self) {
        self.target_hz = clamp_or(
            self.target_hz,
            MIN_TARGET_HZ,
            MAX_TARGET_HZ,
            Self::default().target_hz,
        );
    }

    /// Source samples advanced per output sample
    pub fn resample_ratio(&self) -> f64 {
        let ratio = self.target_hz.clamp(MIN_TARGET_HZ, MAX_TARGET_HZ) as f64 / REFERENCE_HZ as f64;
        1.0 / ratio
    }
}

/// Catmull-Rom spline through `y1`..`y2` evaluated at `t` in [0, 1)
#[inline]
pub fn catmull_rom(y0: f32, y1: f32, y2: f32, y3: f32, t: f32) -> f32 {
    let c0 = y1;
    let c1 = 0.5 * (y2 - y0);
    let c2 = y0 - 2.5 * y1 + 2.0 * y2 - 0.5 * y3;
    let c3 = 0.5 * (y3 - y0) + 1.5 * (y1 - y2);
    ((c3 * t + c2) * t + c1) * t + c0
}

/// Resample a channel by `resample_ratio`, keeping its length
pub fn resample(samples: &[f32], resample_ratio: f64) -> Vec<f32> {
    let len = samples.len();
    if len == 0 {
        return Vec::new();
    }
    let last = len as isize - 1;
    let at = |index: isize| samples[index.clamp(0, last) as usize];

    (0..len)
        .map(|i| {
            let position = i as f64 * resample_ratio;
            let index = position.floor() as isize;
            if index > last {
                return 0.0;
            }
            let frac = (position - index as f64) as f32;
            bound(catmull_rom(
                at(index - 1),
                at(index),
                at(index + 1),
                at(index + 2),
                frac,
            ))
        })
        .collect()
}

impl Effect for PitchShiftParams {
    fn effect_type(&self) -> &'static str {
        "pitch_shift"
    }

    fn display_name(&self) -> &'static str {
        "Pitch Shift"
    }

    fn process_channel(&self, samples: &[f32], _sample_rate: u32) -> Vec<f32> {
        resample(samples, self.resample_ratio())
    }

    fn summary(&self) -> String {
        format!("A4 {:.1} Hz -> {:.1} Hz", REFERENCE_HZ, self.target_hz)
    }
}
