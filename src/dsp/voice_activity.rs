//! Coarse voice-activity heuristic
//!
//! Splits a channel into ~50 ms windows and marks a window "voice-like"
//! when its RMS energy exceeds a fixed floor. This is energy only: it
//! cannot tell speech from any other loud sound and is not a verified
//! detector. Callers use it to weight processing, never to gate it.

use super::effect::ms_to_samples;
use super::filters::OnePoleLowPass;
use crate::engine::buffer::rms;

/// Analysis window length
pub const WINDOW_MS: f32 = 50.0;

/// Windows with RMS above this (about -40 dBFS) count as voice-like
pub const VOICE_RMS_FLOOR: f32 = 0.01;

/// Corner of the ramp that smooths window decisions into blend weights
const MASK_SMOOTHING_HZ: f32 = 16.0;

/// Per-window voice-like classification
pub fn classify_windows(samples: &[f32], sample_rate: u32) -> Vec<bool> {
    let window = ms_to_samples(WINDOW_MS, sample_rate);
    samples
        .chunks(window)
        .map(|chunk| rms(chunk) > VOICE_RMS_FLOOR)
        .collect()
}

/// Per-sample blend weight in [0, 1]
///
/// Window decisions (0 or 1) are expanded to sample resolution and
/// smoothed with a ~10 ms one-pole ramp so the weight never jumps.
pub fn voice_mask(samples: &[f32], sample_rate: u32) -> Vec<f32> {
    let window = ms_to_samples(WINDOW_MS, sample_rate);
    let windows = classify_windows(samples, sample_rate);
    let mut ramp = OnePoleLowPass::new(MASK_SMOOTHING_HZ, sample_rate);

    (0..samples.len())
        .map(|i| {
            let target = if windows[i / window] { 1.0 } else { 0.0 };
            ramp.process_sample(target).clamp(0.0, 1.0)
        })
        .collect()
}
