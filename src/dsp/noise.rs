//! Noise reducer
//!
//! Estimates the noise floor as the 5th percentile of absolute sample
//! values across all channels. Material whose floor is already below
//! -60 dBFS passes through untouched; anything noisier gets one flat
//! attenuation of the requested amount.

use log::debug;
use serde::{Deserialize, Serialize};

use super::effect::{bound, clamp_or, is_degenerate, Effect, EffectOutput};
use crate::engine::buffer::{db_to_linear, linear_to_db, percentile_abs};
use crate::engine::AudioBuffer;
use crate::error::{MasterError, Result};

/// Percentile used as the noise-floor estimate
pub const NOISE_FLOOR_PERCENTILE: f32 = 5.0;

/// Floors below this are considered clean
pub const CLEAN_FLOOR_DB: f32 = -60.0;

/// Largest accepted reduction
pub const MAX_NOISE_REDUCTION_DB: f32 = 40.0;

/// Noise reducer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseReducerParams {
    pub enabled: bool,
    /// Attenuation applied to noisy material, in dB (0-40)
    pub reduction_db: f32,
}

impl Default for NoiseReducerParams {
    fn default() -> Self {
        Self {
            enabled: false,
            reduction_db: 6.0,
        }
    }
}

impl NoiseReducerParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_NOISE_REDUCTION_DB).contains(&self.reduction_db) {
            return Err(MasterError::invalid_parameter(
                "noise_reducer.reduction_db",
                self.reduction_db,
                "0 to 40 dB",
            ));
        }
        Ok(())
    }

    pub fn clamp(&mut self) {
        self.reduction_db = clamp_or(
            self.reduction_db,
            0.0,
            MAX_NOISE_REDUCTION_DB,
            Self::default().reduction_db,
        );
    }

    fn gain(&self) -> f32 {
        db_to_linear(-self.reduction_db.clamp(0.0, MAX_NOISE_REDUCTION_DB))
    }
}

/// Outcome of the noise-floor check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseVerdict {
    /// Floor below -60 dBFS, nothing done
    AlreadyClean { floor_db: f32 },
    /// Flat attenuation applied
    Reduced { floor_db: f32, reduction_db: f32 },
}

/// Estimate the noise floor in dBFS
pub fn noise_floor_db(samples: &[f32]) -> f32 {
    linear_to_db(percentile_abs(samples, NOISE_FLOOR_PERCENTILE))
}

/// Reduce noise in one channel, treating it as the whole signal
pub fn reduce_noise(samples: &[f32], params: &NoiseReducerParams) -> (Vec<f32>, NoiseVerdict) {
    let floor_db = noise_floor_db(samples);
    if is_degenerate(samples) || floor_db < CLEAN_FLOOR_DB {
        return (samples.to_vec(), NoiseVerdict::AlreadyClean { floor_db });
    }
    let gain = params.gain();
    (
        samples.iter().map(|&x| bound(x * gain)).collect(),
        NoiseVerdict::Reduced {
            floor_db,
            reduction_db: params.reduction_db.clamp(0.0, MAX_NOISE_REDUCTION_DB),
        },
    )
}

impl Effect for NoiseReducerParams {
    fn effect_type(&self) -> &'static str {
        "noise_reducer"
    }

    fn display_name(&self) -> &'static str {
        "Noise Reduction"
    }

    fn process_channel(&self, samples: &[f32], _sample_rate: u32) -> Vec<f32> {
        reduce_noise(samples, self).0
    }

    fn summary(&self) -> String {
        format!("-{:.1} dB", self.reduction_db)
    }

    /// The floor is measured across every channel so all channels get the
    /// same decision
    fn apply(&self, buffer: &AudioBuffer) -> EffectOutput {
        if buffer.num_frames() < 2 {
            return EffectOutput {
                buffer: buffer.clone(),
                summary: "already clean (buffer too short to measure)".to_string(),
            };
        }
        let all: Vec<f32> = buffer.iter_samples().collect();
        let floor_db = noise_floor_db(&all);
        debug!("noise floor estimate {:.1} dBFS", floor_db);

        if floor_db < CLEAN_FLOOR_DB {
            return EffectOutput {
                buffer: buffer.clone(),
                summary: format!("already clean (floor {:.1} dBFS)", floor_db),
            };
        }

        let gain = self.gain();
        EffectOutput {
            buffer: buffer.map_channels(|ch| ch.iter().map(|&x| bound(x * gain)).collect()),
            summary: format!("{} (floor {:.1} dBFS)", self.summary(), floor_db),
        }
    }
}
