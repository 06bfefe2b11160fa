//! Spatial enhancer
//!
//! Widens the image by mixing each sample with its ~20 ms-delayed
//! predecessor, scaled by the requested amount.

use serde::{Deserialize, Serialize};

use super::effect::{bound, clamp_or, ms_to_samples, Effect};
use crate::error::{MasterError, Result};

/// Offset of the mixed-in predecessor
pub const SPATIAL_DELAY_MS: f32 = 20.0;

/// Share of the delayed signal at amount = 100%
pub const SPATIAL_MAX_MIX: f32 = 0.5;

/// Spatial enhancer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialParams {
    pub enabled: bool,
    /// Width in percent (0-100)
    pub amount: f32,
}

impl Default for SpatialParams {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 50.0,
        }
    }
}

impl SpatialParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.amount) {
            return Err(MasterError::invalid_parameter(
                "spatial.amount",
                self.amount,
                "0 to 100 %",
            ));
        }
        Ok(())
    }

    pub fn clamp(&mut self) {
        self.amount = clamp_or(self.amount, 0.0, 100.0, Self::default().amount);
    }
}

/// Widen one channel
pub fn widen(samples: &[f32], sample_rate: u32, amount: f32) -> Vec<f32> {
    let offset = ms_to_samples(SPATIAL_DELAY_MS, sample_rate);
    let mix = SPATIAL_MAX_MIX * amount.clamp(0.0, 100.0) / 100.0;
    samples
        .iter()
        .enumerate()
        .map(|(n, &x)| {
            let delayed = if n >= offset { samples[n - offset] } else { 0.0 };
            bound(x + mix * delayed)
        })
        .collect()
}

impl Effect for SpatialParams {
    fn effect_type(&self) -> &'static str {
        "spatial"
    }

    fn display_name(&self) -> &'static str {
        "Spatial Enhancement"
    }

    fn process_channel(&self, samples: &[f32], sample_rate: u32) -> Vec<f32> {
        widen(samples, sample_rate, self.amount)
    }

    fn summary(&self) -> String {
        format!("width {:.0}%, {:.0} ms offset", self.amount, SPATIAL_DELAY_MS)
    }
}
