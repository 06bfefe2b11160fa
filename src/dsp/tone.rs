//! Tone shapers
//!
//! Five single-knob coloring stages, each driven by an `amount` in percent:
//!
//! - Clarity: high-pass at 8 kHz, added back up to 50%
//! - Warmth: low-pass at 200 Hz, blended in up to 30%
//! - Brightness: high-pass at 10 kHz, added back up to 40%
//! - Sharpness: high-pass at 3 kHz then 6 kHz, added back up to 35%
//! - Smoothness: low-pass at 500 Hz then 1500 Hz, blended in up to 40%
//!
//! "Added back" means `x + w * filtered`; "blended" means
//! `(1 - w) * x + w * filtered`, where `w = max_share * amount / 100`.

use serde::{Deserialize, Serialize};

use super::effect::{bound, clamp_or, Effect};
use super::filters::{highpass, lowpass};
use crate::error::{MasterError, Result};

/// How a shaper mixes its filtered signal back in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mix {
    /// `x + w * filtered`
    Additive,
    /// `(1 - w) * x + w * filtered`
    Blend,
}

/// The five shaper kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneKind {
    Clarity,
    Warmth,
    Brightness,
    Sharpness,
    Smoothness,
}

/// Filter path applied before mixing
#[derive(Debug, Clone, Copy)]
enum Stage {
    HighPass(f32),
    LowPass(f32),
}

impl ToneKind {
    fn stages(self) -> &'static [Stage] {
        match self {
            ToneKind::Clarity => &[Stage::HighPass(8000.0)],
            ToneKind::Warmth => &[Stage::LowPass(200.0)],
            ToneKind::Brightness => &[Stage::HighPass(10_000.0)],
            ToneKind::Sharpness => &[Stage::HighPass(3000.0), Stage::HighPass(6000.0)],
            ToneKind::Smoothness => &[Stage::LowPass(500.0), Stage::LowPass(1500.0)],
        }
    }

    /// Share of the filtered signal at amount = 100%
    pub fn max_share(self) -> f32 {
        match self {
            ToneKind::Clarity => 0.5,
            ToneKind::Warmth => 0.3,
            ToneKind::Brightness => 0.4,
            ToneKind::Sharpness => 0.35,
            ToneKind::Smoothness => 0.4,
        }
    }

    pub fn mix(self) -> Mix {
        match self {
            ToneKind::Warmth | ToneKind::Smoothness => Mix::Blend,
            ToneKind::Clarity | ToneKind::Brightness | ToneKind::Sharpness => Mix::Additive,
        }
    }

    pub fn effect_type(self) -> &'static str {
        match self {
            ToneKind::Clarity => "clarity",
            ToneKind::Warmth => "warmth",
            ToneKind::Brightness => "brightness",
            ToneKind::Sharpness => "sharpness",
            ToneKind::Smoothness => "smoothness",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ToneKind::Clarity => "Clarity",
            ToneKind::Warmth => "Warmth",
            ToneKind::Brightness => "Brightness",
            ToneKind::Sharpness => "Sharpness",
            ToneKind::Smoothness => "Smoothness",
        }
    }
}

/// Settings for one tone shaper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneParams {
    pub enabled: bool,
    /// Intensity in percent (0-100)
    pub amount: f32,
}

impl Default for ToneParams {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 50.0,
        }
    }
}

impl ToneParams {
    pub fn validate(&self, kind: ToneKind) -> Result<()> {
        if !(0.0..=100.0).contains(&self.amount) {
            return Err(MasterError::invalid_parameter(
                &format!("{}.amount", kind.effect_type()),
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

/// Shape one channel
pub fn shape(samples: &[f32], sample_rate: u32, kind: ToneKind, amount: f32) -> Vec<f32> {
    let weight = kind.max_share() * amount.clamp(0.0, 100.0) / 100.0;

    let filtered = kind
        .stages()
        .iter()
        .fold(samples.to_vec(), |signal, stage| match *stage {
            Stage::HighPass(hz) => highpass(&signal, hz, sample_rate),
            Stage::LowPass(hz) => lowpass(&signal, hz, sample_rate),
        });

    samples
        .iter()
        .zip(&filtered)
        .map(|(&x, &f)| {
            let mixed = match kind.mix() {
                Mix::Additive => x + weight * f,
                Mix::Blend => (1.0 - weight) * x + weight * f,
            };
            bound(mixed)
        })
        .collect()
}

/// A tone shaper bound to its settings, as run by the chain
#[derive(Debug, Clone)]
pub struct ToneShaper {
    pub kind: ToneKind,
    pub params: ToneParams,
}

impl ToneShaper {
    pub fn new(kind: ToneKind, params: ToneParams) -> Self {
        Self { kind, params }
    }
}

impl Effect for ToneShaper {
    fn effect_type(&self) -> &'static str {
        self.kind.effect_type()
    }

    fn display_name(&self) -> &'static str {
        self.kind.display_name()
    }

    fn process_channel(&self, samples: &[f32], sample_rate: u32) -> Vec<f32> {
        shape(samples, sample_rate, self.kind, self.params.amount)
    }

    fn summary(&self) -> String {
        format!("amount {:.0}%", self.params.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::buffer::rms;
    use std::f32::consts::PI;
    use test_case::test_case;

    fn tone(frequency: f32, amplitude: f32) -> Vec<f32> {
        (0..22050)
            .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / 44100.0).sin())
            .collect()
    }

    #[test_case(ToneKind::Clarity)]
    #[test_case(ToneKind::Warmth)]
    #[test_case(ToneKind::Brightness)]
    #[test_case(ToneKind::Sharpness)]
    #[test_case(ToneKind::Smoothness)]
    fn test_zero_amount_is_identity(kind: ToneKind) {
        let input = tone(1000.0, 0.5);
        assert_eq!(shape(&input, 44100, kind, 0.0), input);
    }

    #[test_case(ToneKind::Clarity)]
    #[test_case(ToneKind::Warmth)]
    #[test_case(ToneKind::Brightness)]
    #[test_case(ToneKind::Sharpness)]
    #[test_case(ToneKind::Smoothness)]
    fn test_full_amount_is_bounded(kind: ToneKind) {
        let input = tone(9000.0, 0.97);
        let out = shape(&input, 44100, kind, 100.0);
        assert_eq!(out.len(), input.len());
        assert!(out.iter().all(|s| s.abs() <= 0.98));
    }

    #[test]
    fn test_brightness_lifts_treble_not_bass() {
        let treble = tone(15_000.0, 0.3);
        let bass = tone(100.0, 0.3);
        let treble_gain = rms(&shape(&treble, 44100, ToneKind::Brightness, 100.0)) / rms(&treble);
        let bass_gain = rms(&shape(&bass, 44100, ToneKind::Brightness, 100.0)) / rms(&bass);
        assert!(treble_gain > 1.08, "treble gain {}", treble_gain);
        assert!((bass_gain - 1.0).abs() < 0.02, "bass gain {}", bass_gain);
    }

    #[test]
    fn test_smoothness_softens_treble() {
        let treble = tone(8000.0, 0.5);
        let out = shape(&treble, 44100, ToneKind::Smoothness, 100.0);
        assert!(rms(&out) < rms(&treble) * 0.7);
    }

    #[test]
    fn test_warmth_keeps_bass() {
        let bass = tone(50.0, 0.5);
        let out = shape(&bass, 44100, ToneKind::Warmth, 100.0);
        assert!(rms(&out) > rms(&bass) * 0.9);
    }

    #[test]
    fn test_amount_is_clamped() {
        let input = tone(12_000.0, 0.2);
        assert_eq!(
            shape(&input, 44100, ToneKind::Clarity, 250.0),
            shape(&input, 44100, ToneKind::Clarity, 100.0)
        );
        let mut params = ToneParams {
            enabled: true,
            amount: -5.0,
        };
        assert!(params.validate(ToneKind::Clarity).is_err());
        params.clamp();
        assert_eq!(params.amount, 0.0);

        params.amount = f32::NAN;
        params.clamp();
        assert_eq!(params.amount, 50.0);
    }

    #[test]
    fn test_mix_modes() {
        assert_eq!(ToneKind::Warmth.mix(), Mix::Blend);
        assert_eq!(ToneKind::Sharpness.mix(), Mix::Additive);
        let shaper = ToneShaper::new(ToneKind::Sharpness, ToneParams::default());
        assert_eq!(shaper.effect_type(), "sharpness");
        assert_eq!(shaper.summary(), "amount 50%");
    }
}
