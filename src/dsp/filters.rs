//! One-pole filter primitives
//!
//! Low-pass: `y[n] = y[n-1] + (1 - a) * (x[n] - y[n-1])`, `a = exp(-2*pi*fc/sr)`.
//! High-pass is the complement `x[n] - lowpass(x[n])`.
//!
//! Each filter holds one sample of memory. The structs keep that memory
//! across `process_block` calls so chunked input matches whole-buffer
//! processing; the free functions build a fresh filter per call.

use std::f32::consts::PI;

/// Smoothing coefficient `a` for a cutoff frequency
///
/// The cutoff is kept inside (0, Nyquist]; a zero or negative cutoff
/// yields a filter that never moves.
#[inline]
pub fn pole_coefficient(cutoff_hz: f32, sample_rate: u32) -> f32 {
    let sample_rate = sample_rate.max(1) as f32;
    let cutoff = cutoff_hz.clamp(0.0, sample_rate / 2.0);
    (-2.0 * PI * cutoff / sample_rate).exp()
}

/// One-pole low-pass filter
#[derive(Debug, Clone, Copy)]
pub struct OnePoleLowPass {
    coeff: f32,
    state: f32,
}

impl OnePoleLowPass {
    pub fn new(cutoff_hz: f32, sample_rate: u32) -> Self {
        Self {
            coeff: pole_coefficient(cutoff_hz, sample_rate),
            state: 0.0,
        }
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        self.state += (1.0 - self.coeff) * (input - self.state);
        self.state
    }

    pub fn process_block(&mut self, input: &[f32]) -> Vec<f32> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

/// One-pole high-pass filter (input minus its low-passed copy)
#[derive(Debug, Clone, Copy)]
pub struct OnePoleHighPass {
    lowpass: OnePoleLowPass,
}

impl OnePoleHighPass {
    pub fn new(cutoff_hz: f32, sample_rate: u32) -> Self {
        Self {
            lowpass: OnePoleLowPass::new(cutoff_hz, sample_rate),
        }
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        input - self.lowpass.process_sample(input)
    }

    pub fn process_block(&mut self, input: &[f32]) -> Vec<f32> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    pub fn reset(&mut self) {
        self.lowpass.reset();
    }
}

/// Low-pass a whole channel with fresh state
pub fn lowpass(samples: &[f32], cutoff_hz: f32, sample_rate: u32) -> Vec<f32> {
    OnePoleLowPass::new(cutoff_hz, sample_rate).process_block(samples)
}

/// High-pass a whole channel with fresh state
pub fn highpass(samples: &[f32], cutoff_hz: f32, sample_rate: u32) -> Vec<f32> {
    OnePoleHighPass::new(cutoff_hz, sample_rate).process_block(samples)
}
