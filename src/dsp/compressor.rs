//! Compressor effect
//!
//! Feed-forward compressor driven by the envelope follower. Above the
//! threshold the gain is `(envelope / threshold)^(1/ratio - 1)`, then the
//! makeup gain is applied and the result is bounded.
//!
//! With `voice_regions_only` set, the compressed and unprocessed signals
//! are blended per sample using the coarse voice-activity mask.

use serde::{Deserialize, Serialize};

use super::effect::{bound, clamp_or, Effect};
use super::envelope::EnvelopeFollower;
use super::voice_activity::voice_mask;
use crate::engine::buffer::db_to_linear;
use crate::error::{MasterError, Result};

/// Compressor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorParams {
    pub enabled: bool,
    /// Threshold level in dB (-60 to 0 dB)
    pub threshold_db: f32,
    /// Compression ratio (1.0 to 20.0, representing 1:1 to 20:1)
    pub ratio: f32,
    /// Attack time in milliseconds (0.1 to 2000 ms)
    pub attack_ms: f32,
    /// Release time in milliseconds (0.1 to 2000 ms)
    pub release_ms: f32,
    /// Makeup gain in dB (0 to 24 dB)
    pub makeup_gain_db: f32,
    /// Only compress where the voice-activity heuristic finds energy
    pub voice_regions_only: bool,
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold_db: -18.0,
            ratio: 4.0,
            attack_ms: 10.0,
            release_ms: 100.0,
            makeup_gain_db: 0.0,
            voice_regions_only: false,
        }
    }
}

impl CompressorParams {
    /// Validate parameters against their ranges
    pub fn validate(&self) -> Result<()> {
        if !(-60.0..=0.0).contains(&self.threshold_db) {
            return Err(MasterError::invalid_parameter(
                "compressor.threshold_db",
                self.threshold_db,
                "-60 to 0 dB",
            ));
        }
        if !(1.0..=20.0).contains(&self.ratio) {
            return Err(MasterError::invalid_parameter(
                "compressor.ratio",
                self.ratio,
                "1.0 to 20.0",
            ));
        }
        if !(0.1..=2000.0).contains(&self.attack_ms) {
            return Err(MasterError::invalid_parameter(
                "compressor.attack_ms",
                self.attack_ms,
                "0.1 to 2000 ms",
            ));
        }
        if !(0.1..=2000.0).contains(&self.release_ms) {
            return Err(MasterError::invalid_parameter(
                "compressor.release_ms",
                self.release_ms,
                "0.1 to 2000 ms",
            ));
        }
        if !(0.0..=24.0).contains(&self.makeup_gain_db) {
            return Err(MasterError::invalid_parameter(
                "compressor.makeup_gain_db",
                self.makeup_gain_db,
                "0 to 24 dB",
            ));
        }
        Ok(())
    }

    /// Clamp parameters to valid ranges
    pub fn clamp(&mut self) {
        let defaults = Self::default();
        self.threshold_db = clamp_or(self.threshold_db, -60.0, 0.0, defaults.threshold_db);
        self.ratio = clamp_or(self.ratio, 1.0, 20.0, defaults.ratio);
        self.attack_ms = clamp_or(self.attack_ms, 0.1, 2000.0, defaults.attack_ms);
        self.release_ms = clamp_or(self.release_ms, 0.1, 2000.0, defaults.release_ms);
        self.makeup_gain_db = clamp_or(self.makeup_gain_db, 0.0, 24.0, defaults.makeup_gain_db);
    }
}

/// Compress one channel
pub fn compress(samples: &[f32], sample_rate: u32, params: &CompressorParams) -> Vec<f32> {
    let threshold = db_to_linear(params.threshold_db.clamp(-60.0, 0.0));
    let ratio = params.ratio.max(1.0);
    let exponent = 1.0 / ratio - 1.0;
    let makeup = db_to_linear(params.makeup_gain_db.clamp(0.0, 24.0));

    let mut follower = EnvelopeFollower::new(params.attack_ms, params.release_ms, sample_rate);
    let mask = if params.voice_regions_only {
        Some(voice_mask(samples, sample_rate))
    } else {
        None
    };

    samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let envelope = follower.process_sample(x);
            let gain = if envelope > threshold {
                (envelope / threshold).powf(exponent)
            } else {
                1.0
            };
            let compressed = x * gain * makeup;
            let out = match &mask {
                Some(mask) => compressed * mask[i] + x * (1.0 - mask[i]),
                None => compressed,
            };
            bound(out)
        })
        .collect()
}

impl Effect for CompressorParams {
    fn effect_type(&self) -> &'static str {
        "compressor"
    }

    fn display_name(&self) -> &'static str {
        "Compression"
    }

    fn process_channel(&self, samples: &[f32], sample_rate: u32) -> Vec<f32> {
        compress(samples, sample_rate, self)
    }

    fn summary(&self) -> String {
        let mut summary = format!(
            "threshold {:.1} dB, ratio {:.1}:1, attack {:.1} ms, release {:.1} ms, makeup {:.1} dB",
            self.threshold_db, self.ratio, self.attack_ms, self.release_ms, self.makeup_gain_db
        );
        if self.voice_regions_only {
            summary.push_str(", voice regions only");
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::buffer::peak;
    use approx::assert_abs_diff_eq;

    fn sine(amplitude: f32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
            .collect()
    }

    #[test]
    fn test_default_params() {
        let params = CompressorParams::default();
        assert!(!params.enabled);
        assert_eq!(params.ratio, 4.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_parameter_validation() {
        let mut params = CompressorParams::default();
        params.ratio = 0.5;
        assert!(params.validate().is_err());
        params.ratio = 4.0;
        params.threshold_db = -70.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_parameter_clamping() {
        let mut params = CompressorParams {
            enabled: true,
            threshold_db: -100.0,
            ratio: 0.2,
            attack_ms: 0.0,
            release_ms: 5000.0,
            makeup_gain_db: 50.0,
            voice_regions_only: false,
        };
        params.clamp();
        assert_eq!(params.threshold_db, -60.0);
        assert_eq!(params.ratio, 1.0);
        assert_eq!(params.attack_ms, 0.1);
        assert_eq!(params.release_ms, 2000.0);
        assert_eq!(params.makeup_gain_db, 24.0);
    }

    #[test]
    fn test_clamping_replaces_nan_with_default() {
        let mut params = CompressorParams {
            enabled: true,
            threshold_db: f32::NAN,
            ratio: f32::INFINITY,
            release_ms: f32::NAN,
            ..Default::default()
        };
        params.clamp();
        let defaults = CompressorParams::default();
        assert_eq!(params.threshold_db, defaults.threshold_db);
        assert_eq!(params.ratio, 20.0);
        assert_eq!(params.release_ms, defaults.release_ms);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_ratio_one_is_identity() {
        let input = sine(0.8, 4410);
        for threshold_db in [-60.0, -30.0, -6.0, 0.0] {
            let params = CompressorParams {
                threshold_db,
                ratio: 1.0,
                ..Default::default()
            };
            let out = compress(&input, 44100, &params);
            for (a, b) in input.iter().zip(&out) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_ratio_below_one_treated_as_one() {
        let input = sine(0.8, 2000);
        let params = CompressorParams {
            threshold_db: -30.0,
            ratio: 0.25,
            ..Default::default()
        };
        let out = compress(&input, 44100, &params);
        for (a, b) in input.iter().zip(&out) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_below_threshold_unchanged() {
        let input = sine(0.05, 4410);
        let params = CompressorParams {
            threshold_db: -10.0,
            ..Default::default()
        };
        let out = compress(&input, 44100, &params);
        assert_eq!(input, out);
    }

    #[test]
    fn test_above_threshold_reduces_peak() {
        let input = sine(0.5, 4410);
        let params = CompressorParams {
            threshold_db: -20.0,
            ratio: 4.0,
            attack_ms: 0.1,
            release_ms: 10.0,
            ..Default::default()
        };
        let out = compress(&input, 44100, &params);
        assert!(peak(&out[2205..]) < peak(&input[2205..]) * 0.8);
    }

    #[test]
    fn test_makeup_gain_bounded() {
        let input = sine(0.9, 4410);
        let params = CompressorParams {
            threshold_db: 0.0,
            ratio: 1.0,
            makeup_gain_db: 24.0,
            ..Default::default()
        };
        let out = compress(&input, 44100, &params);
        assert!(out.iter().all(|s| s.abs() <= 0.98));
    }

    #[test]
    fn test_voice_regions_leave_quiet_sections_alone() {
        // Quiet but non-zero first half, loud second half
        let mut input = sine(0.005, 8820);
        input.extend(sine(0.7, 8820));
        let params = CompressorParams {
            threshold_db: -60.0,
            ratio: 10.0,
            attack_ms: 0.1,
            voice_regions_only: true,
            ..Default::default()
        };
        let out = compress(&input, 44100, &params);
        // Quiet region passes through because its mask weight is zero
        for (a, b) in input[..4410].iter().zip(&out[..4410]) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
        // Loud region is compressed
        assert!(peak(&out[13230..]) < peak(&input[13230..]));
    }

    #[test]
    fn test_summary() {
        let params = CompressorParams::default();
        assert!(params.summary().contains("ratio 4.0:1"));
        assert_eq!(params.effect_type(), "compressor");
    }
}
