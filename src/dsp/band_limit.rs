//! Frequency filter and feedback reducer
//!
//! The frequency filter is a band limiter: low-pass at the high cutoff
//! followed by high-pass at the low cutoff.
//!
//! The feedback reducer turns a reduction amount into one linear gain and
//! applies it uniformly. Despite its "multi-notch" naming in older
//! documents it is a flat attenuation.

use serde::{Deserialize, Serialize};

use super::effect::{bound, clamp_or, Effect};
use super::filters::{OnePoleHighPass, OnePoleLowPass};
use crate::engine::buffer::db_to_linear;
use crate::error::{MasterError, Result};

/// Lowest accepted low cutoff
pub const MIN_LOW_CUTOFF_HZ: f32 = 20.0;

/// Highest accepted low cutoff
pub const MAX_LOW_CUTOFF_HZ: f32 = 20_000.0;

/// Highest accepted high cutoff (Nyquist of a 192 kHz stream)
pub const MAX_HIGH_CUTOFF_HZ: f32 = 96_000.0;

/// Distance kept between the high cutoff and Nyquist
pub const NYQUIST_MARGIN_HZ: f32 = 100.0;

/// Largest accepted feedback reduction before the mobile doubling
pub const MAX_FEEDBACK_REDUCTION_DB: f32 = 29.9;

// ============================================================================
// Frequency Filter
// ============================================================================

/// Band-limiting filter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyFilterParams {
    pub enabled: bool,
    /// High-pass corner in Hz (20-20000)
    pub low_cutoff_hz: f32,
    /// Low-pass corner in Hz, above the low cutoff; processing also caps
    /// it at Nyquist - 100 Hz
    pub high_cutoff_hz: f32,
}

impl Default for FrequencyFilterParams {
    fn default() -> Self {
        Self {
            enabled: false,
            low_cutoff_hz: MIN_LOW_CUTOFF_HZ,
            high_cutoff_hz: 20_000.0,
        }
    }
}

impl FrequencyFilterParams {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LOW_CUTOFF_HZ..=MAX_LOW_CUTOFF_HZ).contains(&self.low_cutoff_hz) {
            return Err(MasterError::invalid_parameter(
                "frequency_filter.low_cutoff_hz",
                self.low_cutoff_hz,
                "20 to 20000 Hz",
            ));
        }
        if !(self.high_cutoff_hz > self.low_cutoff_hz && self.high_cutoff_hz <= MAX_HIGH_CUTOFF_HZ)
        {
            return Err(MasterError::invalid_parameter(
                "frequency_filter.high_cutoff_hz",
                self.high_cutoff_hz,
                "above the low cutoff, at most 96000 Hz",
            ));
        }
        Ok(())
    }

    /// Pull both corners into range; the high corner ends at least 1 Hz
    /// above the low one
    pub fn clamp(&mut self) {
        let defaults = Self::default();
        self.low_cutoff_hz = clamp_or(
            self.low_cutoff_hz,
            MIN_LOW_CUTOFF_HZ,
            MAX_LOW_CUTOFF_HZ,
            defaults.low_cutoff_hz,
        );
        self.high_cutoff_hz = clamp_or(
            self.high_cutoff_hz,
            self.low_cutoff_hz + 1.0,
            MAX_HIGH_CUTOFF_HZ,
            defaults.high_cutoff_hz.max(self.low_cutoff_hz + 1.0),
        );
    }

    /// Corners adjusted to the sample rate: `(low, high)`
    pub fn effective_cutoffs(&self, sample_rate: u32) -> (f32, f32) {
        let ceiling = (sample_rate as f32 / 2.0 - NYQUIST_MARGIN_HZ).max(MIN_LOW_CUTOFF_HZ);
        let low = self.low_cutoff_hz.max(MIN_LOW_CUTOFF_HZ);
        let high = self.high_cutoff_hz.min(ceiling);
        (low, high)
    }
}

/// Band-limit one channel
pub fn band_limit(samples: &[f32], sample_rate: u32, params: &FrequencyFilterParams) -> Vec<f32> {
    let (low, high) = params.effective_cutoffs(sample_rate);
    let mut lowpass = OnePoleLowPass::new(high, sample_rate);
    let mut highpass = OnePoleHighPass::new(low, sample_rate);
    samples
        .iter()
        .map(|&x| bound(highpass.process_sample(lowpass.process_sample(x))))
        .collect()
}

impl Effect for FrequencyFilterParams {
    fn effect_type(&self) -> &'static str {
        "frequency_filter"
    }

    fn display_name(&self) -> &'static str {
        "Frequency Filter"
    }

    fn process_channel(&self, samples: &[f32], sample_rate: u32) -> Vec<f32> {
        band_limit(samples, sample_rate, self)
    }

    fn summary(&self) -> String {
        format!(
            "pass band {:.0} Hz to {:.0} Hz",
            self.low_cutoff_hz, self.high_cutoff_hz
        )
    }
}

// ============================================================================
// Feedback Reducer
// ============================================================================

/// Feedback reducer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackReducerParams {
    pub enabled: bool,
    /// Attenuation in dB (0 to 29.9)
    pub reduction_db: f32,
    /// Mobile-class playback context doubles the reduction
    pub mobile_context: bool,
}

impl Default for FeedbackReducerParams {
    fn default() -> Self {
        Self {
            enabled: false,
            reduction_db: 6.0,
            mobile_context: false,
        }
    }
}

impl FeedbackReducerParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_FEEDBACK_REDUCTION_DB).contains(&self.reduction_db) {
            return Err(MasterError::invalid_parameter(
                "feedback_reducer.reduction_db",
                self.reduction_db,
                "0 to 29.9 dB",
            ));
        }
        Ok(())
    }

    pub fn clamp(&mut self) {
        self.reduction_db = clamp_or(
            self.reduction_db,
            0.0,
            MAX_FEEDBACK_REDUCTION_DB,
            Self::default().reduction_db,
        );
    }

    /// Total attenuation in dB after capping and the mobile doubling
    pub fn effective_reduction_db(&self) -> f32 {
        let capped = self.reduction_db.clamp(0.0, MAX_FEEDBACK_REDUCTION_DB);
        if self.mobile_context {
            capped * 2.0
        } else {
            capped
        }
    }

    /// Linear gain applied to every sample
    pub fn gain(&self) -> f32 {
        db_to_linear(-self.effective_reduction_db())
    }
}

/// Attenuate one channel by the reducer's flat gain
pub fn reduce_feedback(samples: &[f32], params: &FeedbackReducerParams) -> Vec<f32> {
    let gain = params.gain();
    samples.iter().map(|&x| bound(x * gain)).collect()
}

impl Effect for FeedbackReducerParams {
    fn effect_type(&self) -> &'static str {
        "feedback_reducer"
    }

    fn display_name(&self) -> &'static str {
        "Feedback Reduction"
    }

    fn process_channel(&self, samples: &[f32], _sample_rate: u32) -> Vec<f32> {
        reduce_feedback(samples, self)
    }

    fn summary(&self) -> String {
        let mut summary = format!("-{:.1} dB flat", self.effective_reduction_db());
        if self.mobile_context {
            summary.push_str(" (mobile)");
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::buffer::peak;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    fn tone(frequency: f32, sample_rate: u32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| 0.5 * (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_cutoffs_respect_sample_rate() {
        let params = FrequencyFilterParams {
            enabled: true,
            low_cutoff_hz: 5.0,
            high_cutoff_hz: 30_000.0,
        };
        let (low, high) = params.effective_cutoffs(44100);
        assert_eq!(low, 20.0);
        assert_eq!(high, 21_950.0);
    }

    #[test]
    fn test_cutoffs_at_tiny_sample_rate() {
        let (low, high) = FrequencyFilterParams::default().effective_cutoffs(8);
        assert_eq!(low, 20.0);
        assert_eq!(high, 20.0);
    }

    #[test]
    fn test_clamp_orders_inverted_cutoffs() {
        let mut params = FrequencyFilterParams {
            enabled: true,
            low_cutoff_hz: 5000.0,
            high_cutoff_hz: 100.0,
        };
        assert!(params.validate().is_err());
        params.clamp();
        assert_eq!(params.low_cutoff_hz, 5000.0);
        assert_eq!(params.high_cutoff_hz, 5001.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_clamp_bounds_cutoffs_from_above() {
        let mut params = FrequencyFilterParams {
            enabled: true,
            low_cutoff_hz: f32::INFINITY,
            high_cutoff_hz: 1.0e9,
        };
        params.clamp();
        assert_eq!(params.low_cutoff_hz, MAX_LOW_CUTOFF_HZ);
        assert_eq!(params.high_cutoff_hz, MAX_HIGH_CUTOFF_HZ);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_clamp_defaults_nan_cutoffs() {
        let mut params = FrequencyFilterParams {
            enabled: true,
            low_cutoff_hz: f32::NAN,
            high_cutoff_hz: f32::NAN,
        };
        params.clamp();
        assert_eq!(
            params,
            FrequencyFilterParams {
                enabled: true,
                ..Default::default()
            }
        );

        // a NaN high corner above a raised low corner still lands above it
        let mut params = FrequencyFilterParams {
            enabled: true,
            low_cutoff_hz: 20_000.0,
            high_cutoff_hz: f32::NAN,
        };
        params.clamp();
        assert_eq!(params.high_cutoff_hz, 20_001.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_band_limit_passes_mid_band() {
        let input = tone(1000.0, 44100, 44100);
        let params = FrequencyFilterParams {
            enabled: true,
            low_cutoff_hz: 20.0,
            high_cutoff_hz: 20_000.0,
        };
        let out = band_limit(&input, 44100, &params);
        assert_eq!(out.len(), input.len());
        assert!(peak(&out[22050..]) > 0.4);
    }

    #[test]
    fn test_band_limit_removes_out_of_band() {
        let input = tone(8000.0, 44100, 44100);
        let params = FrequencyFilterParams {
            enabled: true,
            low_cutoff_hz: 20.0,
            high_cutoff_hz: 300.0,
        };
        let out = band_limit(&input, 44100, &params);
        assert!(peak(&out[22050..]) < 0.05);
    }

    #[test]
    fn test_feedback_gain_is_flat() {
        let params = FeedbackReducerParams {
            enabled: true,
            reduction_db: 6.0,
            mobile_context: false,
        };
        let input = tone(440.0, 44100, 1000);
        let out = reduce_feedback(&input, &params);
        for (a, b) in input.iter().zip(&out) {
            assert_abs_diff_eq!(*b, a * 0.501187, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_feedback_reduction_capped_and_doubled() {
        let mut params = FeedbackReducerParams {
            enabled: true,
            reduction_db: 45.0,
            mobile_context: false,
        };
        assert_abs_diff_eq!(params.effective_reduction_db(), 29.9, epsilon = 1e-6);
        params.mobile_context = true;
        assert_abs_diff_eq!(params.effective_reduction_db(), 59.8, epsilon = 1e-4);
        assert!(params.summary().contains("mobile"));
    }

    #[test]
    fn test_negative_reduction_is_unity() {
        let params = FeedbackReducerParams {
            enabled: true,
            reduction_db: -12.0,
            mobile_context: false,
        };
        assert_eq!(params.gain(), 1.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_feedback_clamp_defaults_nan() {
        let mut params = FeedbackReducerParams {
            enabled: true,
            reduction_db: f32::NAN,
            mobile_context: true,
        };
        params.clamp();
        assert_eq!(params.reduction_db, 6.0);
        assert!(params.mobile_context);
        assert!(params.validate().is_ok());
    }
}
