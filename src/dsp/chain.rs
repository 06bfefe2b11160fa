//! Mastering chain
//!
//! Effects always run in one fixed order:
//! 1. Compression
//! 2. Parametric EQ
//! 3. Pitch Shift
//! 4. Frequency Filter
//! 5. Feedback Reduction
//! 6. Noise Reduction
//! 7. Delay
//! 8. De-esser
//! 9. Clarity, Warmth, Brightness, Sharpness, Smoothness
//! 10. Spatial Enhancement
//! 11. Master Gain (always last)
//!
//! Each stage consumes the previous stage's full output. The
//! already-processed detector runs once against the original input and
//! never changes what runs.

use log::{debug, info, warn};

use super::detector::detect;
use super::effect::Effect;
use super::tone::ToneShaper;
use crate::engine::AudioBuffer;
use crate::error::MasterError;
use crate::report::{AppliedEffect, ProcessingReport, ProcessingResult};
use crate::settings::{EffectSettings, TONE_KINDS};

/// The enabled stages of one settings record, in chain order
pub struct MasteringChain {
    effects: Vec<Box<dyn Effect>>,
}

impl MasteringChain {
    /// Build the chain for a settings record
    ///
    /// Parameters are sanitized first; out-of-range values are clamped and
    /// logged, never rejected.
    pub fn from_settings(settings: &EffectSettings) -> Self {
        let s = settings.sanitized();
        let mut effects: Vec<Box<dyn Effect>> = Vec::new();

        if s.compressor.enabled {
            effects.push(Box::new(s.compressor.clone()));
        }
        if s.eq.enabled {
            effects.push(Box::new(s.eq.clone()));
        }
        if s.pitch_shift.enabled {
            effects.push(Box::new(s.pitch_shift.clone()));
        }
        if s.frequency_filter.enabled {
            effects.push(Box::new(s.frequency_filter.clone()));
        }
        if s.feedback_reducer.enabled {
            effects.push(Box::new(s.feedback_reducer.clone()));
        }
        if s.noise_reducer.enabled {
            effects.push(Box::new(s.noise_reducer.clone()));
        }
        if s.delay.enabled {
            effects.push(Box::new(s.delay.clone()));
        }
        if s.de_esser.enabled {
            effects.push(Box::new(s.de_esser.clone()));
        }
        for kind in TONE_KINDS {
            let params = s.tone(kind);
            if params.enabled {
                effects.push(Box::new(ToneShaper::new(kind, params.clone())));
            }
        }
        if s.spatial.enabled {
            effects.push(Box::new(s.spatial.clone()));
        }
        if s.master_gain.enabled {
            effects.push(Box::new(s.master_gain.clone()));
        }

        Self { effects }
    }

    /// Run every stage over `input`
    ///
    /// Never fails: degenerate buffers pass through each stage, and any
    /// non-finite sample a stage lets through is zeroed before the next.
    pub fn process(&self, input: &AudioBuffer) -> ProcessingResult {
        let detector = detect(input);
        debug!(
            "detector: already_processed={} ({})",
            detector.already_processed, detector.reason
        );
        info!(
            "processing {} frames x {} channels through {} stages",
            input.num_frames(),
            input.num_channels(),
            self.effects.len()
        );

        let mut buffer = input.clone();
        let mut entries = Vec::with_capacity(self.effects.len());

        for effect in &self.effects {
            let output = effect.apply(&buffer);
            buffer = output.buffer;
            if !buffer.is_valid() {
                let error = MasterError::DspOverflow {
                    effect: effect.effect_type().to_string(),
                };
                warn!("{}; zeroing non-finite samples", error);
                buffer = buffer.map_channels(|ch| {
                    ch.iter()
                        .map(|&s| if s.is_finite() { s } else { 0.0 })
                        .collect()
                });
            }
            debug!("applied {}: {}", effect.display_name(), output.summary);
            entries.push(AppliedEffect {
                name: effect.display_name().to_string(),
                effect_type: effect.effect_type().to_string(),
                parameters: output.summary,
            });
        }

        ProcessingResult {
            buffer,
            report: ProcessingReport::new(entries, detector),
        }
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate over stages in chain order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Effect> {
        self.effects.iter().map(|e| e.as_ref())
    }

    /// Effect type identifiers in chain order
    pub fn effect_types(&self) -> Vec<&'static str> {
        self.iter().map(|e| e.effect_type()).collect()
    }
}

/// Run `settings` over `input` in one call
pub fn process(input: &AudioBuffer, settings: &EffectSettings) -> ProcessingResult {
    MasteringChain::from_settings(settings).process(input)
}
