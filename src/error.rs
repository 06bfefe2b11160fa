//! Error handling for masterchain
//!
//! The processing pipeline itself never fails: invalid parameters are
//! clamped and degenerate buffers pass through. Errors only surface at the
//! edges (buffer construction, strict settings validation, file I/O).

use thiserror::Error;

/// Result type alias for masterchain operations
pub type Result<T> = std::result::Result<T, MasterError>;

/// Main error type for masterchain operations
#[derive(Error, Debug)]
pub enum MasterError {
    #[error("Invalid effect parameter: {param} = {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Invalid audio buffer: {details}")]
    InvalidBuffer { details: String },

    #[error("DSP overflow: effect '{effect}' produced invalid audio (NaN/Inf)")]
    DspOverflow { effect: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MasterError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            MasterError::InvalidParameter { .. } => "INVALID_PARAMETER",
            MasterError::InvalidBuffer { .. } => "INVALID_BUFFER",
            MasterError::DspOverflow { .. } => "DSP_OVERFLOW",
            MasterError::Io(_) => "IO_ERROR",
            MasterError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            MasterError::InvalidParameter { .. } => {
                "Adjust the parameter to be within valid range, or drop --strict to clamp it"
            }
            MasterError::InvalidBuffer { .. } => {
                "Make sure every channel has the same number of samples"
            }
            MasterError::DspOverflow { .. } => "Try reducing the effect intensity",
            MasterError::Io(_) => "Check that the path exists and is writable",
            MasterError::Serialization(_) => "Check the JSON document against the expected schema",
        }
    }

    pub(crate) fn invalid_parameter(
        param: &str,
        value: impl ToString,
        expected: &str,
    ) -> Self {
        MasterError::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}
