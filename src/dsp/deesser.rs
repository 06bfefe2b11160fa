//! De-esser
//!
//! Measures local energy (mean square) in a symmetric ~3 ms window around
//! every sample. Where the energy exceeds a fixed trigger level the sample
//! is attenuated by a fixed factor; everywhere else it passes through.
//! On multichannel buffers the energy is averaged across channels so every
//! channel is attenuated at the same instants.

use serde::{Deserialize, Serialize};

use super::effect::{bound, ms_to_samples, Effect, EffectOutput};
use crate::engine::AudioBuffer;

/// Total width of the energy window
pub const WINDOW_MS: f32 = 3.0;

/// Mean-square energy that triggers attenuation
pub const ENERGY_TRIGGER: f32 = 0.15;

/// Gain applied to triggered samples
pub const ATTENUATION: f32 = 0.5;

/// De-esser parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeEsserParams {
    pub enabled: bool,
}

/// Local mean-square energy for every sample
pub fn local_energy(samples: &[f32], sample_rate: u32) -> Vec<f32> {
    let power: Vec<f32> = samples.iter().map(|x| x * x).collect();
    windowed_mean(&power, sample_rate)
}

/// Mean of `power` over the symmetric window around each index
fn windowed_mean(power: &[f32], sample_rate: u32) -> Vec<f32> {
    let len = power.len();
    let half = (ms_to_samples(WINDOW_MS, sample_rate) / 2).max(1);

    // Prefix sums keep this O(n)
    let mut prefix = Vec::with_capacity(len + 1);
    prefix.push(0.0_f64);
    for &p in power {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + p as f64);
    }

    (0..len)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(len);
            ((prefix[end] - prefix[start]) / (end - start) as f64) as f32
        })
        .collect()
}

fn attenuate(samples: &[f32], energy: &[f32]) -> Vec<f32> {
    samples
        .iter()
        .zip(energy)
        .map(|(&x, &e)| {
            if e > ENERGY_TRIGGER {
                bound(x * ATTENUATION)
            } else {
                bound(x)
            }
        })
        .collect()
}

/// De-ess one channel
pub fn deess(samples: &[f32], sample_rate: u32) -> Vec<f32> {
    attenuate(samples, &local_energy(samples, sample_rate))
}

impl Effect for DeEsserParams {
    fn effect_type(&self) -> &'static str {
        "de_esser"
    }

    fn display_name(&self) -> &'static str {
        "De-esser"
    }

    fn process_channel(&self, samples: &[f32], sample_rate: u32) -> Vec<f32> {
        deess(samples, sample_rate)
    }

    fn summary(&self) -> String {
        format!(
            "trigger energy {:.2}, attenuation x{:.1}",
            ENERGY_TRIGGER, ATTENUATION
        )
    }

    fn apply(&self, buffer: &AudioBuffer) -> EffectOutput {
        let frames = buffer.num_frames();
        if frames < 2 {
            return EffectOutput {
                buffer: buffer.clone(),
                summary: self.summary(),
            };
        }

        let channels = buffer.num_channels() as f32;
        let mut power = vec![0.0_f32; frames];
        for channel in buffer.channels() {
            for (p, &x) in power.iter_mut().zip(channel) {
                *p += x * x / channels;
            }
        }
        let energy = windowed_mean(&power, buffer.sample_rate());

        EffectOutput {
            buffer: buffer.map_channels(|ch| attenuate(ch, &energy)),
            summary: self.summary(),
        }
    }
}
