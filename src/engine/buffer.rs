//! Audio Buffer Management
//!
//! Provides the core audio buffer type and level-measurement helpers.
//! Buffers are immutable inputs to the pipeline: every effect builds a new
//! buffer of identical shape.

use serde::{Deserialize, Serialize};

use crate::error::{MasterError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Level reported for silence instead of -inf (keeps reports JSON-safe)
pub const SILENCE_FLOOR_DB: f32 = -120.0;

/// Lowest accepted sample rate; 0 Hz is clamped up to this
pub const MIN_SAMPLE_RATE: u32 = 1;

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns [`SILENCE_FLOOR_DB`] for zero (or negative) input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        SILENCE_FLOOR_DB
    } else {
        (20.0 * linear.log10()).max(SILENCE_FLOOR_DB)
    }
}

/// Root mean square of a sample slice. Returns 0.0 for empty input.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

/// Largest absolute sample value. Returns 0.0 for empty input.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Peak-to-RMS ratio (linear). Returns 0.0 for silent or empty input.
pub fn crest_factor(samples: &[f32]) -> f32 {
    let rms = rms(samples);
    if rms <= 0.0 {
        0.0
    } else {
        peak(samples) / rms
    }
}

/// The `p`-th percentile (0-100) of absolute sample values.
///
/// Uses nearest-rank on a sorted copy. Returns 0.0 for empty input.
pub fn percentile_abs(samples: &[f32], p: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut magnitudes: Vec<f32> = samples
        .iter()
        .map(|s| if s.is_finite() { s.abs() } else { 0.0 })
        .collect();
    magnitudes.sort_by(|a, b| a.total_cmp(b));
    let rank = ((p.clamp(0.0, 100.0) / 100.0) * (magnitudes.len() - 1) as f32).round() as usize;
    magnitudes[rank.min(magnitudes.len() - 1)]
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Multi-channel PCM audio with a fixed sample rate
///
/// Samples are stored per channel (`samples[channel][frame]`) and are
/// nominally in [-1, 1]. Every channel has the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAudioBuffer")]
pub struct AudioBuffer {
    /// Sample rate in Hz
    sample_rate: u32,
    /// Per-channel sample data
    samples: Vec<Vec<f32>>,
}

/// Unchecked wire form, validated through [`AudioBuffer::new`]
#[derive(Deserialize)]
struct RawAudioBuffer {
    sample_rate: u32,
    samples: Vec<Vec<f32>>,
}

impl TryFrom<RawAudioBuffer> for AudioBuffer {
    type Error = MasterError;

    fn try_from(raw: RawAudioBuffer) -> Result<Self> {
        AudioBuffer::new(raw.samples, raw.sample_rate)
    }
}

impl AudioBuffer {
    /// Create a buffer from per-channel samples
    ///
    /// A sample rate of 0 is clamped to 1 Hz. Fails when there are no
    /// channels or when channel lengths differ.
    pub fn new(samples: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(MasterError::InvalidBuffer {
                details: "buffer has no channels".to_string(),
            });
        }
        let frames = samples[0].len();
        if let Some((index, channel)) = samples
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frames)
        {
            return Err(MasterError::InvalidBuffer {
                details: format!(
                    "channel {} has {} samples, expected {}",
                    index,
                    channel.len(),
                    frames
                ),
            });
        }
        Ok(Self {
            sample_rate: sample_rate.max(MIN_SAMPLE_RATE),
            samples,
        })
    }

    /// Create a single-channel buffer
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(MIN_SAMPLE_RATE),
            samples: vec![samples],
        }
    }

    /// Create a silent buffer
    pub fn silence(num_channels: usize, num_frames: usize, sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(MIN_SAMPLE_RATE),
            samples: vec![vec![0.0; num_frames]; num_channels.max(1)],
        }
    }

    /// Create a mono sine test tone
    pub fn sine(frequency: f32, amplitude: f32, duration_secs: f32, sample_rate: u32) -> Self {
        let sample_rate = sample_rate.max(MIN_SAMPLE_RATE);
        let num_frames = (duration_secs.max(0.0) * sample_rate as f32).round() as usize;
        let samples = (0..num_frames)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect();
        Self::mono(samples, sample_rate)
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples per channel
    pub fn num_frames(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.num_frames() as f32 / self.sample_rate as f32
    }

    /// Samples of one channel (empty slice when out of range)
    pub fn channel(&self, index: usize) -> &[f32] {
        self.samples.get(index).map_or(&[], Vec::as_slice)
    }

    /// All channels
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.samples
    }

    /// Every sample of every channel, channel by channel
    pub fn iter_samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().flat_map(|ch| ch.iter().copied())
    }

    /// Build a new buffer by transforming each channel independently
    ///
    /// The closure must return a channel of the same length; results are
    /// padded with zeros or truncated otherwise.
    pub fn map_channels<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&[f32]) -> Vec<f32>,
    {
        let frames = self.num_frames();
        let samples = self
            .samples
            .iter()
            .map(|ch| {
                let mut out = f(ch);
                out.resize(frames, 0.0);
                out
            })
            .collect();
        Self {
            sample_rate: self.sample_rate,
            samples,
        }
    }

    /// Check if buffer contains only finite samples
    pub fn is_valid(&self) -> bool {
        self.iter_samples().all(f32::is_finite)
    }

    /// Check if buffers are approximately equal within tolerance
    pub fn is_approx_equal(&self, other: &AudioBuffer, tolerance: f32) -> bool {
        self.sample_rate == other.sample_rate
            && self.num_channels() == other.num_channels()
            && self
                .samples
                .iter()
                .zip(other.samples.iter())
                .all(|(a, b)| {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
                })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_db_conversions() {
        assert_abs_diff_eq!(db_to_linear(0.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(db_to_linear(-6.0), 0.501187, epsilon = 1e-4);
        assert_abs_diff_eq!(linear_to_db(0.5), -6.0206, epsilon = 1e-3);
        assert_eq!(linear_to_db(0.0), SILENCE_FLOOR_DB);
        assert_eq!(linear_to_db(1e-12), SILENCE_FLOOR_DB);
    }

    #[test]
    fn test_new_rejects_ragged_channels() {
        let result = AudioBuffer::new(vec![vec![0.0; 4], vec![0.0; 3]], 44100);
        assert!(matches!(result, Err(MasterError::InvalidBuffer { .. })));
    }

    #[test]
    fn test_new_rejects_no_channels() {
        assert!(AudioBuffer::new(vec![], 44100).is_err());
    }

    #[test]
    fn test_zero_sample_rate_clamped() {
        let buffer = AudioBuffer::mono(vec![0.1, 0.2], 0);
        assert_eq!(buffer.sample_rate(), MIN_SAMPLE_RATE);
    }

    #[test]
    fn test_sine_generation() {
        let buffer = AudioBuffer::sine(440.0, 0.5, 1.0, 44100);
        assert_eq!(buffer.num_channels(), 1);
        assert_eq!(buffer.num_frames(), 44100);
        assert_abs_diff_eq!(buffer.duration(), 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(peak(buffer.channel(0)), 0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_rms_of_sine() {
        let buffer = AudioBuffer::sine(440.0, 1.0, 1.0, 44100);
        // RMS of a sine is 1/sqrt(2)
        assert_abs_diff_eq!(rms(buffer.channel(0)), 0.7071, epsilon = 1e-3);
        assert_abs_diff_eq!(crest_factor(buffer.channel(0)), 1.4142, epsilon = 1e-2);
    }

    #[test]
    fn test_measurements_on_empty_input() {
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(peak(&[]), 0.0);
        assert_eq!(crest_factor(&[]), 0.0);
        assert_eq!(percentile_abs(&[], 5.0), 0.0);
    }

    #[test]
    fn test_percentile_abs() {
        let samples: Vec<f32> = (0..=100).map(|i| -(i as f32) / 100.0).collect();
        assert_abs_diff_eq!(percentile_abs(&samples, 5.0), 0.05, epsilon = 1e-6);
        assert_abs_diff_eq!(percentile_abs(&samples, 100.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(percentile_abs(&[0.3], 5.0), 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_map_channels_preserves_length() {
        let buffer = AudioBuffer::new(vec![vec![0.1; 8], vec![0.2; 8]], 48000).unwrap();
        let shorter = buffer.map_channels(|ch| ch[..4].to_vec());
        assert_eq!(shorter.num_frames(), 8);
        assert_eq!(shorter.channel(1)[7], 0.0);
        let longer = buffer.map_channels(|ch| [ch, ch].concat());
        assert_eq!(longer.num_frames(), 8);
    }

    #[test]
    fn test_is_valid() {
        let mut samples = vec![0.0; 10];
        assert!(AudioBuffer::mono(samples.clone(), 44100).is_valid());
        samples[5] = f32::NAN;
        assert!(!AudioBuffer::mono(samples, 44100).is_valid());
    }

    #[test]
    fn test_serde_round_trip_keeps_precision() {
        let buffer = AudioBuffer::mono(vec![0.123_456_78, -0.987_654_3, 1.0e-7], 48000);
        let json = serde_json::to_string(&buffer).unwrap();
        let restored: AudioBuffer = serde_json::from_str(&json).unwrap();
        assert_eq!(buffer, restored);
    }

    #[test]
    fn test_deserialize_rejects_ragged_channels() {
        let json = r#"{"sample_rate": 44100, "samples": [[0.0, 0.1], [0.0]]}"#;
        assert!(serde_json::from_str::<AudioBuffer>(json).is_err());
    }
}
