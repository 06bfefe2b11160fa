//! Parametric EQ Effect
//!
//! Four independently toggleable bands built from the one-pole primitives:
//!
//! | band       | filter                          | blend |
//! | ---------- | ------------------------------- | ----- |
//! | low shelf  | low-pass                        | 50%   |
//! | mid peak   | low-passed first difference     | 100%  |
//! | high shelf | high-pass                       | 50%   |
//! | presence   | high-pass                       | 30%   |
//!
//! Shelves and presence add `share * (G - 1) * filtered` with
//! `G = 10^(dB/20)`. The mid band adds `(A - 1) * band` with
//! `A = 10^(dB/40)`. Bands run in the order above, each on the previous
//! band's output.

use serde::{Deserialize, Serialize};

use super::effect::{bound, clamp_or, Effect};
use super::filters::{highpass, lowpass, OnePoleLowPass};
use crate::engine::buffer::db_to_linear;
use crate::error::{MasterError, Result};

/// Band gain range in dB
pub const MAX_BAND_GAIN_DB: f32 = 24.0;

const SHELF_BLEND: f32 = 0.5;
const PRESENCE_BLEND: f32 = 0.3;

/// Single EQ band configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqBand {
    /// Whether this band is enabled
    pub enabled: bool,
    /// Corner/center frequency in Hz (20-20000)
    pub frequency_hz: f32,
    /// Gain in dB (-24 to +24)
    pub gain_db: f32,
}

impl Default for EqBand {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency_hz: 1000.0,
            gain_db: 0.0,
        }
    }
}

impl EqBand {
    fn at(frequency_hz: f32) -> Self {
        Self {
            frequency_hz,
            ..Default::default()
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(20.0..=20_000.0).contains(&self.frequency_hz) {
            return Err(MasterError::invalid_parameter(
                &format!("eq.{}.frequency_hz", name),
                self.frequency_hz,
                "20 to 20000 Hz",
            ));
        }
        if !(-MAX_BAND_GAIN_DB..=MAX_BAND_GAIN_DB).contains(&self.gain_db) {
            return Err(MasterError::invalid_parameter(
                &format!("eq.{}.gain_db", name),
                self.gain_db,
                "-24 to +24 dB",
            ));
        }
        Ok(())
    }

    fn clamp(&mut self, defaults: &EqBand) {
        self.frequency_hz = clamp_or(self.frequency_hz, 20.0, 20_000.0, defaults.frequency_hz);
        self.gain_db = clamp_or(
            self.gain_db,
            -MAX_BAND_GAIN_DB,
            MAX_BAND_GAIN_DB,
            defaults.gain_db,
        );
    }
}

/// Four-band parametric EQ parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametricEqParams {
    pub enabled: bool,
    pub low_shelf: EqBand,
    pub mid: EqBand,
    pub high_shelf: EqBand,
    pub presence: EqBand,
}

impl Default for ParametricEqParams {
    fn default() -> Self {
        Self {
            enabled: false,
            low_shelf: EqBand::at(120.0),
            mid: EqBand::at(1000.0),
            high_shelf: EqBand::at(8000.0),
            presence: EqBand::at(4000.0),
        }
    }
}

impl ParametricEqParams {
    pub fn validate(&self) -> Result<()> {
        self.low_shelf.validate("low_shelf")?;
        self.mid.validate("mid")?;
        self.high_shelf.validate("high_shelf")?;
        self.presence.validate("presence")
    }

    /// Clamp every band; a NaN falls back to that band's own default
    pub fn clamp(&mut self) {
        let defaults = Self::default();
        self.low_shelf.clamp(&defaults.low_shelf);
        self.mid.clamp(&defaults.mid);
        self.high_shelf.clamp(&defaults.high_shelf);
        self.presence.clamp(&defaults.presence);
    }

    fn bands(&self) -> [(&'static str, &EqBand); 4] {
        [
            ("low", &self.low_shelf),
            ("mid", &self.mid),
            ("high", &self.high_shelf),
            ("presence", &self.presence),
        ]
    }
}

/// Add `share * (G - 1) * filtered` to the input
fn shelf(samples: &[f32], filtered: &[f32], gain_db: f32, share: f32) -> Vec<f32> {
    let boost = share * (db_to_linear(gain_db) - 1.0);
    samples
        .iter()
        .zip(filtered)
        .map(|(&x, &f)| bound(x + boost * f))
        .collect()
}

/// Low-pass a shelf below `frequency_hz`
pub fn low_shelf(samples: &[f32], sample_rate: u32, band: &EqBand) -> Vec<f32> {
    let filtered = lowpass(samples, band.frequency_hz, sample_rate);
    shelf(samples, &filtered, band.gain_db, SHELF_BLEND)
}

/// Peaking approximation around `frequency_hz`
///
/// The first difference emphasizes content above DC; low-passing it at the
/// band frequency leaves a bump around the band.
pub fn mid_peak(samples: &[f32], sample_rate: u32, band: &EqBand) -> Vec<f32> {
    let amount = 10.0_f32.powf(band.gain_db / 40.0) - 1.0;
    let mut smoother = OnePoleLowPass::new(band.frequency_hz, sample_rate);
    let mut previous = 0.0;
    samples
        .iter()
        .map(|&x| {
            let band_signal = smoother.process_sample(x - previous);
            previous = x;
            bound(x + amount * band_signal)
        })
        .collect()
}

/// High-pass shelf above `frequency_hz`
pub fn high_shelf(samples: &[f32], sample_rate: u32, band: &EqBand) -> Vec<f32> {
    let filtered = highpass(samples, band.frequency_hz, sample_rate);
    shelf(samples, &filtered, band.gain_db, SHELF_BLEND)
}

/// Presence lift above `frequency_hz`
pub fn presence(samples: &[f32], sample_rate: u32, band: &EqBand) -> Vec<f32> {
    let filtered = highpass(samples, band.frequency_hz, sample_rate);
    shelf(samples, &filtered, band.gain_db, PRESENCE_BLEND)
}

/// Run every enabled band over one channel
pub fn equalize(samples: &[f32], sample_rate: u32, params: &ParametricEqParams) -> Vec<f32> {
    let mut output = samples.to_vec();
    if params.low_shelf.enabled {
        output = low_shelf(&output, sample_rate, &params.low_shelf);
    }
    if params.mid.enabled {
        output = mid_peak(&output, sample_rate, &params.mid);
    }
    if params.high_shelf.enabled {
        output = high_shelf(&output, sample_rate, &params.high_shelf);
    }
    if params.presence.enabled {
        output = presence(&output, sample_rate, &params.presence);
    }
    output
}

impl Effect for ParametricEqParams {
    fn effect_type(&self) -> &'static str {
        "parametric_eq"
    }

    fn display_name(&self) -> &'static str {
        "Parametric EQ"
    }

    fn process_channel(&self, samples: &[f32], sample_rate: u32) -> Vec<f32> {
        equalize(samples, sample_rate, self)
    }

    fn summary(&self) -> String {
        let active: Vec<String> = self
            .bands()
            .iter()
            .filter(|(_, band)| band.enabled)
            .map(|(name, band)| format!("{} {:+.1} dB @ {:.0} Hz", name, band.gain_db, band.frequency_hz))
            .collect();
        if active.is_empty() {
            "no bands enabled".to_string()
        } else {
            active.join(", ")
        }
    }
}
