//! Effect trait definition
//!
//! Base trait for every stage of the mastering chain. Effects are pure:
//! they read the previous stage's full output and return a new buffer,
//! so no recursion state ever crosses a stage boundary.

use crate::engine::AudioBuffer;

/// Every stage clamps its output to +/- this bound
pub const OUTPUT_CEILING: f32 = 0.98;

/// Clamp a sample to the shared output bound; non-finite values become 0.0
#[inline]
pub fn bound(sample: f32) -> f32 {
    if sample.is_finite() {
        sample.clamp(-OUTPUT_CEILING, OUTPUT_CEILING)
    } else {
        0.0
    }
}

/// Channels of length 0 or 1 pass through every effect unchanged
#[inline]
pub fn is_degenerate(samples: &[f32]) -> bool {
    samples.len() < 2
}

/// Convert milliseconds to a sample count, never below one sample
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: u32) -> usize {
    ((ms.max(0.0) / 1000.0) * sample_rate as f32).round().max(1.0) as usize
}

/// Clamp a parameter into `[min, max]`; NaN takes `fallback`
#[inline]
pub fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Result of running one effect over a buffer
#[derive(Debug, Clone)]
pub struct EffectOutput {
    /// Processed audio (same shape as the input)
    pub buffer: AudioBuffer,
    /// Human-readable parameter summary for the report
    pub summary: String,
}

/// Base trait for all chain stages
///
/// Implementors only need [`Effect::process_channel`]; channels are
/// processed independently with fresh filter state.
pub trait Effect {
    /// Stable effect identifier (e.g. "compressor")
    fn effect_type(&self) -> &'static str;

    /// Name shown in the processing report
    fn display_name(&self) -> &'static str;

    /// Process one channel, returning a new channel of equal length
    fn process_channel(&self, samples: &[f32], sample_rate: u32) -> Vec<f32>;

    /// Parameter summary for the report
    fn summary(&self) -> String;

    /// Process a whole buffer
    fn apply(&self, buffer: &AudioBuffer) -> EffectOutput {
        let sample_rate = buffer.sample_rate();
        let processed = buffer.map_channels(|channel| {
            if is_degenerate(channel) {
                channel.to_vec()
            } else {
                self.process_channel(channel, sample_rate)
            }
        });
        EffectOutput {
            buffer: processed,
            summary: self.summary(),
        }
    }
}
