//! Effect settings
//!
//! One record with a section per chain stage. Every section carries its own
//! `enabled` flag; the default record has every effect disabled, so an
//! empty JSON object `{}` is a valid (no-op) configuration.

use std::fmt::Debug;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::dsp::{
    CompressorParams, DeEsserParams, DelayParams, FeedbackReducerParams, FrequencyFilterParams,
    MasterGainParams, NoiseReducerParams, ParametricEqParams, PitchShiftParams, SpatialParams,
    ToneKind, ToneParams,
};
use crate::error::Result;

/// Settings for the whole mastering chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    pub compressor: CompressorParams,
    pub eq: ParametricEqParams,
    pub pitch_shift: PitchShiftParams,
    pub frequency_filter: FrequencyFilterParams,
    pub feedback_reducer: FeedbackReducerParams,
    pub noise_reducer: NoiseReducerParams,
    pub delay: DelayParams,
    pub de_esser: DeEsserParams,
    pub clarity: ToneParams,
    pub warmth: ToneParams,
    pub brightness: ToneParams,
    pub sharpness: ToneParams,
    pub smoothness: ToneParams,
    pub spatial: SpatialParams,
    pub master_gain: MasterGainParams,
}

impl EffectSettings {
    /// Every effect enabled with its default parameters
    pub fn all_enabled() -> Self {
        let mut settings = Self::default();
        settings.compressor.enabled = true;
        settings.eq.enabled = true;
        settings.pitch_shift.enabled = true;
        settings.frequency_filter.enabled = true;
        settings.feedback_reducer.enabled = true;
        settings.noise_reducer.enabled = true;
        settings.delay.enabled = true;
        settings.de_esser.enabled = true;
        for kind in TONE_KINDS {
            settings.tone_mut(kind).enabled = true;
        }
        settings.spatial.enabled = true;
        settings.master_gain.enabled = true;
        settings
    }

    /// Settings of one tone shaper
    pub fn tone(&self, kind: ToneKind) -> &ToneParams {
        match kind {
            ToneKind::Clarity => &self.clarity,
            ToneKind::Warmth => &self.warmth,
            ToneKind::Brightness => &self.brightness,
            ToneKind::Sharpness => &self.sharpness,
            ToneKind::Smoothness => &self.smoothness,
        }
    }

    /// Mutable settings of one tone shaper
    pub fn tone_mut(&mut self, kind: ToneKind) -> &mut ToneParams {
        match kind {
            ToneKind::Clarity => &mut self.clarity,
            ToneKind::Warmth => &mut self.warmth,
            ToneKind::Brightness => &mut self.brightness,
            ToneKind::Sharpness => &mut self.sharpness,
            ToneKind::Smoothness => &mut self.smoothness,
        }
    }

    /// Number of enabled effects
    pub fn enabled_count(&self) -> usize {
        [
            self.compressor.enabled,
            self.eq.enabled,
            self.pitch_shift.enabled,
            self.frequency_filter.enabled,
            self.feedback_reducer.enabled,
            self.noise_reducer.enabled,
            self.delay.enabled,
            self.de_esser.enabled,
            self.clarity.enabled,
            self.warmth.enabled,
            self.brightness.enabled,
            self.sharpness.enabled,
            self.smoothness.enabled,
            self.spatial.enabled,
            self.master_gain.enabled,
        ]
        .iter()
        .filter(|enabled| **enabled)
        .count()
    }

    /// True when no effect is enabled
    pub fn is_all_disabled(&self) -> bool {
        self.enabled_count() == 0
    }

    /// Strict check: the first out-of-range parameter, if any
    ///
    /// Disabled sections are checked too, so a record that validates can be
    /// toggled freely without re-validation.
    pub fn validate(&self) -> Result<()> {
        self.compressor.validate()?;
        self.eq.validate()?;
        self.pitch_shift.validate()?;
        self.frequency_filter.validate()?;
        self.feedback_reducer.validate()?;
        self.noise_reducer.validate()?;
        self.delay.validate()?;
        for kind in TONE_KINDS {
            self.tone(kind).validate(kind)?;
        }
        self.spatial.validate()?;
        self.master_gain.validate()?;
        Ok(())
    }

    /// A copy with every parameter pulled into its valid range
    ///
    /// Each section clamps itself: infinite values go to the nearest bound
    /// and NaN falls back to that section's default. Each changed section
    /// is logged at `warn`.
    pub fn sanitized(&self) -> Self {
        let mut clamped = self.clone();
        clamped.compressor.clamp();
        clamped.eq.clamp();
        clamped.pitch_shift.clamp();
        clamped.frequency_filter.clamp();
        clamped.feedback_reducer.clamp();
        clamped.noise_reducer.clamp();
        clamped.delay.clamp();
        for kind in TONE_KINDS {
            clamped.tone_mut(kind).clamp();
        }
        clamped.spatial.clamp();
        clamped.master_gain.clamp();

        note_clamped("compressor", &self.compressor, &clamped.compressor);
        note_clamped("eq", &self.eq, &clamped.eq);
        note_clamped("pitch_shift", &self.pitch_shift, &clamped.pitch_shift);
        note_clamped("frequency_filter", &self.frequency_filter, &clamped.frequency_filter);
        note_clamped("feedback_reducer", &self.feedback_reducer, &clamped.feedback_reducer);
        note_clamped("noise_reducer", &self.noise_reducer, &clamped.noise_reducer);
        note_clamped("delay", &self.delay, &clamped.delay);
        for kind in TONE_KINDS {
            note_clamped(kind.effect_type(), self.tone(kind), clamped.tone(kind));
        }
        note_clamped("spatial", &self.spatial, &clamped.spatial);
        note_clamped("master_gain", &self.master_gain, &clamped.master_gain);
        clamped
    }
}

/// Tone shapers in chain order
pub const TONE_KINDS: [ToneKind; 5] = [
    ToneKind::Clarity,
    ToneKind::Warmth,
    ToneKind::Brightness,
    ToneKind::Sharpness,
    ToneKind::Smoothness,
];

fn note_clamped<T: PartialEq + Debug>(section: &str, before: &T, after: &T) {
    if before != after {
        warn!(
            "{} parameters out of range, clamped: {:?} -> {:?}",
            section, before, after
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MasterError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_all_disabled() {
        let settings = EffectSettings::default();
        assert!(settings.is_all_disabled());
        assert_eq!(settings.enabled_count(), 0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_all_enabled() {
        let settings = EffectSettings::all_enabled();
        assert_eq!(settings.enabled_count(), 15);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.sanitized(), settings);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "compressor": { "enabled": true, "ratio": 8.0 },
            "master_gain": { "enabled": true, "gain_db": -3.0 },
            "some_future_section": { "enabled": true }
        }"#;
        let settings: EffectSettings = serde_json::from_str(json).unwrap();

        let mut expected = EffectSettings::default();
        expected.compressor.enabled = true;
        expected.compressor.ratio = 8.0;
        expected.master_gain.enabled = true;
        expected.master_gain.gain_db = -3.0;
        assert_eq!(settings, expected);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = EffectSettings::all_enabled();
        settings.delay.delay_ms = 120.0;
        settings.warmth.amount = 80.0;
        let json = serde_json::to_string(&settings).unwrap();
        let back: EffectSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_validate_reports_first_bad_parameter() {
        let mut settings = EffectSettings::default();
        settings.compressor.ratio = 0.5;
        settings.delay.delay_ms = -10.0;
        match settings.validate() {
            Err(MasterError::InvalidParameter { param, .. }) => {
                assert_eq!(param, "compressor.ratio")
            }
            other => panic!("expected invalid parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_sanitized_clamps_without_mutating() {
        let mut settings = EffectSettings::default();
        settings.compressor.ratio = 0.5;
        settings.delay.delay_ms = -10.0;
        settings.master_gain.gain_db = f32::INFINITY;

        let clean = settings.sanitized();
        assert_eq!(clean.compressor.ratio, 1.0);
        assert_eq!(clean.delay.delay_ms, 0.0);
        assert_eq!(clean.master_gain.gain_db, 24.0);
        assert!(clean.validate().is_ok());
        // caller's record untouched
        assert_eq!(settings.compressor.ratio, 0.5);
    }

    #[test]
    fn test_sanitized_replaces_nan_with_default() {
        let mut settings = EffectSettings::all_enabled();
        settings.spatial.amount = f32::NAN;
        settings.compressor.threshold_db = f32::NAN;

        let clean = settings.sanitized();
        assert_eq!(clean.spatial.amount, SpatialParams::default().amount);
        assert_eq!(
            clean.compressor.threshold_db,
            CompressorParams::default().threshold_db
        );
        assert!(clean.spatial.enabled);
        assert!(clean.validate().is_ok());
    }

    #[test]
    fn test_sanitized_always_validates() {
        let mut settings = EffectSettings::all_enabled();
        settings.frequency_filter.low_cutoff_hz = 5000.0;
        settings.frequency_filter.high_cutoff_hz = 100.0;
        settings.eq.mid.gain_db = f32::NAN;
        settings.delay.position_y = f32::NEG_INFINITY;
        settings.warmth.amount = f32::INFINITY;
        settings.pitch_shift.target_hz = f32::NAN;
        assert!(settings.validate().is_err());

        let clean = settings.sanitized();
        assert!(clean.validate().is_ok());
        assert!(clean.frequency_filter.high_cutoff_hz > clean.frequency_filter.low_cutoff_hz);
        assert_eq!(clean.eq.mid.gain_db, 0.0);
        assert_eq!(clean.delay.position_y, -50.0);
        assert_eq!(clean.warmth.amount, 100.0);
        assert_eq!(clean.pitch_shift.target_hz, 440.0);
    }

    #[test]
    fn test_tone_accessors() {
        let mut settings = EffectSettings::default();
        settings.tone_mut(ToneKind::Sharpness).amount = 20.0;
        assert_eq!(settings.sharpness.amount, 20.0);
        assert_eq!(settings.tone(ToneKind::Sharpness).amount, 20.0);
    }
}
