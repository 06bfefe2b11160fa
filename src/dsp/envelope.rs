//! Envelope follower
//!
//! Tracks signal magnitude with independent attack and release speeds:
//!
//! ```text
//! env[0] = |x[0]|
//! env[n] = env[n-1] + (|x[n]| - env[n-1]) / tau
//! ```
//!
//! where `tau` is the attack length in samples while the magnitude rises
//! and the release length while it falls.

use super::effect::ms_to_samples;

/// Attack/release magnitude tracker
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeFollower {
    attack_samples: f32,
    release_samples: f32,
    level: f32,
    primed: bool,
}

impl EnvelopeFollower {
    pub fn new(attack_ms: f32, release_ms: f32, sample_rate: u32) -> Self {
        Self {
            attack_samples: ms_to_samples(attack_ms, sample_rate) as f32,
            release_samples: ms_to_samples(release_ms, sample_rate) as f32,
            level: 0.0,
            primed: false,
        }
    }

    /// Feed one sample and return the updated envelope
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let magnitude = input.abs();
        if !self.primed {
            self.level = magnitude;
            self.primed = true;
            return self.level;
        }
        let tau = if magnitude > self.level {
            self.attack_samples
        } else {
            self.release_samples
        };
        self.level += (magnitude - self.level) / tau;
        self.level
    }

    pub fn process_block(&mut self, input: &[f32]) -> Vec<f32> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Current envelope level
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
        self.primed = false;
    }
}

/// Envelope of a whole channel with fresh state
pub fn follow_envelope(samples: &[f32], attack_ms: f32, release_ms: f32, sample_rate: u32) -> Vec<f32> {
    EnvelopeFollower::new(attack_ms, release_ms, sample_rate).process_block(samples)
}
