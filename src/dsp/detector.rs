//! Already-processed detector
//!
//! A time-domain heuristic that guesses whether the input has already been
//! mastered. It runs once per chain invocation against the original input
//! and is informational only: the chain never skips a stage because of it.
//!
//! # Signatures
//! - Heavily limited: peak at or above -1 dBFS with a crest factor below 4
//! - Gated or denoised: noise floor below -80 dBFS while RMS is above -20 dBFS

use serde::{Deserialize, Serialize};

use super::noise::noise_floor_db;
use crate::engine::buffer::{crest_factor, linear_to_db, peak, rms, SILENCE_FLOOR_DB};
use crate::engine::AudioBuffer;

/// Peak level (dBFS) at or above which material looks limited
const LIMITED_PEAK_DB: f32 = -1.0;

/// Crest factor (linear) below which material looks limited
const LIMITED_CREST_FACTOR: f32 = 4.0;

/// Noise floor (dBFS) below which material looks gated
const GATED_FLOOR_DB: f32 = -80.0;

/// RMS (dBFS) above which a gated floor counts as a processed master
const GATED_MIN_RMS_DB: f32 = -20.0;

/// Detector verdict and the measurements behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorResult {
    pub already_processed: bool,
    pub reason: String,
    pub noise_floor_db: f32,
    pub peak_db: f32,
    pub crest_factor: f32,
}

impl DetectorResult {
    fn too_short() -> Self {
        Self {
            already_processed: false,
            reason: "too short to analyze".to_string(),
            noise_floor_db: SILENCE_FLOOR_DB,
            peak_db: SILENCE_FLOOR_DB,
            crest_factor: 0.0,
        }
    }
}

/// Run the heuristic over every channel of `buffer`
pub fn detect(buffer: &AudioBuffer) -> DetectorResult {
    if buffer.num_frames() < 2 {
        return DetectorResult::too_short();
    }

    let all: Vec<f32> = buffer
        .iter_samples()
        .map(|s| if s.is_finite() { s } else { 0.0 })
        .collect();
    let noise_floor_db = noise_floor_db(&all);
    let peak_db = linear_to_db(peak(&all));
    let rms_db = linear_to_db(rms(&all));
    let crest = crest_factor(&all);

    let limited = peak_db >= LIMITED_PEAK_DB && crest > 0.0 && crest < LIMITED_CREST_FACTOR;
    let gated = noise_floor_db < GATED_FLOOR_DB && rms_db > GATED_MIN_RMS_DB;

    let reason = if limited {
        format!(
            "heavily limited (peak {:.1} dBFS, crest factor {:.2})",
            peak_db, crest
        )
    } else if gated {
        format!(
            "gated or denoised (floor {:.1} dBFS under {:.1} dBFS RMS)",
            noise_floor_db, rms_db
        )
    } else {
        "no processing signature found".to_string()
    };

    DetectorResult {
        already_processed: limited || gated,
        reason,
        noise_floor_db,
        peak_db,
        crest_factor: crest,
    }
}
