//! DSP Effects Library
//!
//! Primitive filters, the envelope follower, every mastering stage and the
//! chain that sequences them. All stages implement the `Effect` trait.

mod band_limit;
mod chain;
mod compressor;
mod deesser;
mod delay;
mod detector;
mod effect;
mod envelope;
mod eq;
mod filters;
mod gain;
mod noise;
mod pitch;
mod spatial;
mod tone;
mod voice_activity;

pub use band_limit::{
    band_limit, reduce_feedback, FeedbackReducerParams, FrequencyFilterParams,
    MAX_FEEDBACK_REDUCTION_DB,
};
pub use chain::{process, MasteringChain};
pub use compressor::{compress, CompressorParams};
pub use deesser::{deess, local_energy, DeEsserParams};
pub use delay::{delay, DelayLine, DelayParams, MAX_DELAY_MS};
pub use detector::{detect, DetectorResult};
pub use effect::{
    bound, clamp_or, is_degenerate, ms_to_samples, Effect, EffectOutput, OUTPUT_CEILING,
};
pub use envelope::{follow_envelope, EnvelopeFollower};
pub use eq::{equalize, high_shelf, low_shelf, mid_peak, presence, EqBand, ParametricEqParams};
pub use filters::{highpass, lowpass, pole_coefficient, OnePoleHighPass, OnePoleLowPass};
pub use gain::{apply_gain, MasterGainParams};
pub use noise::{noise_floor_db, reduce_noise, NoiseReducerParams, NoiseVerdict};
pub use pitch::{catmull_rom, resample, PitchShiftParams, MAX_TARGET_HZ, MIN_TARGET_HZ};
pub use spatial::{widen, SpatialParams};
pub use tone::{shape, Mix, ToneKind, ToneParams, ToneShaper};
pub use voice_activity::{classify_windows, voice_mask};
