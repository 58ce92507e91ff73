//! Error types for the checked BFP surface.
//!
//! The low-level kernels in [`crate::vect`] and [`crate::fft`] treat bad lengths and shifts as
//! caller contract violations. The [`crate::bfp`] types validate their arguments once, before
//! touching any data, and report problems through [`BfpError`]. Saturation is never an error.

use thiserror::Error;

/// Errors reported by BFP vector and FFT operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BfpError {
    /// Two operands (or an operand and an output) have different lengths.
    #[error("Length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The operation needs at least one element.
    #[error("Operation requires a non-empty vector")]
    EmptyVector,

    /// FFT length is not a power of two or lies outside the supported range.
    #[error("Invalid FFT length {length}: must be a power of two in [{min}, {max}]")]
    InvalidFftLength {
        length: usize,
        min: usize,
        max: usize,
    },

    /// A scratch buffer is shorter than the operation requires.
    #[error("Scratch buffer too small: need {required} elements, got {actual}")]
    ScratchTooSmall { required: usize, actual: usize },

    /// Clip bounds are inverted.
    #[error("Invalid clip bounds: lower bound {lower} exceeds upper bound {upper}")]
    InvalidBounds { lower: i64, upper: i64 },

    /// Square root depth outside `1..=max`.
    #[error("Invalid sqrt depth {depth}: must be in 1..={max}")]
    InvalidDepth { depth: u32, max: u32 },
}

/// Result type alias for BFP operations.
pub type Result<T> = std::result::Result<T, BfpError>;

/// Creates a length mismatch error.
pub fn length_mismatch(expected: usize, actual: usize) -> BfpError {
    BfpError::LengthMismatch { expected, actual }
}

/// Creates an FFT length error using the crate's supported range.
pub fn invalid_fft_length(length: usize) -> BfpError {
    BfpError::InvalidFftLength {
        length,
        min: crate::MIN_FFT_LENGTH,
        max: crate::MAX_FFT_LENGTH,
    }
}

/// Returns `Ok(())` when both lengths agree.
pub(crate) fn ensure_same_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(length_mismatch(expected, actual))
    }
}

pub(crate) fn ensure_non_empty(length: usize) -> Result<()> {
    if length == 0 {
        Err(BfpError::EmptyVector)
    } else {
        Ok(())
    }
}

/// Checks that `length` is a power of two within the range covered by the twiddle table.
pub(crate) fn ensure_fft_length(length: usize) -> Result<()> {
    if length.is_power_of_two()
        && (crate::MIN_FFT_LENGTH..=crate::MAX_FFT_LENGTH).contains(&length)
    {
        Ok(())
    } else {
        Err(invalid_fft_length(length))
    }
}

/// Checks the length `N` of a real (mono) FFT. The half-length complex FFT must itself be valid.
pub(crate) fn ensure_mono_fft_length(length: usize) -> Result<()> {
    if length.is_power_of_two()
        && (crate::MIN_MONO_FFT_LENGTH..=crate::MAX_FFT_LENGTH).contains(&length)
    {
        Ok(())
    } else {
        Err(BfpError::InvalidFftLength {
            length,
            min: crate::MIN_MONO_FFT_LENGTH,
            max: crate::MAX_FFT_LENGTH,
        })
    }
}

pub(crate) fn ensure_scratch(required: usize, actual: usize) -> Result<()> {
    if actual < required {
        Err(BfpError::ScratchTooSmall { required, actual })
    } else {
        Ok(())
    }
}
