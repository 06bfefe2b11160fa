//! Master gain
//!
//! The last stage of the chain: one linear scalar `10^(dB/20)` applied to
//! every sample, bounded like every other stage.

use serde::{Deserialize, Serialize};

use super::effect::{bound, clamp_or, Effect};
use crate::engine::buffer::db_to_linear;
use crate::error::{MasterError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Minimum gain in dB
const MIN_GAIN_DB: f32 = -60.0;

/// Maximum gain in dB
const MAX_GAIN_DB: f32 = 24.0;

// ============================================================================
// Master Gain
// ============================================================================

/// Master gain parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterGainParams {
    pub enabled: bool,
    /// Gain in decibels (-60 to +24 dB)
    pub gain_db: f32,
}

impl Default for MasterGainParams {
    fn default() -> Self {
        Self {
            enabled: false,
            gain_db: 0.0,
        }
    }
}

impl MasterGainParams {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_GAIN_DB..=MAX_GAIN_DB).contains(&self.gain_db) {
            return Err(MasterError::invalid_parameter(
                "master_gain.gain_db",
                self.gain_db,
                "-60 to +24 dB",
            ));
        }
        Ok(())
    }

    pub fn clamp(&mut self) {
        self.gain_db = clamp_or(
            self.gain_db,
            MIN_GAIN_DB,
            MAX_GAIN_DB,
            Self::default().gain_db,
        );
    }

    /// Linear gain multiplier
    pub fn gain_linear(&self) -> f32 {
        db_to_linear(self.gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB))
    }
}

/// Apply master gain to one channel
pub fn apply_gain(samples: &[f32], params: &MasterGainParams) -> Vec<f32> {
    let gain = params.gain_linear();
    samples.iter().map(|&x| bound(x * gain)).collect()
}

impl Effect for MasterGainParams {
    fn effect_type(&self) -> &'static str {
        "master_gain"
    }

    fn display_name(&self) -> &'static str {
        "Master Gain"
    }

    fn process_channel(&self, samples: &[f32], _sample_rate: u32) -> Vec<f32> {
        apply_gain(samples, self)
    }

    fn summary(&self) -> String {
        format!("{:+.1} dB", self.gain_db)
    }
}

// ============================================================================
// Tests
// ============================================================================
