//! Block floating-point (BFP) arithmetic on 16 and 32-bit fixed-point mantissa vectors.
//!
//! A BFP vector is a mantissa array sharing a single exponent, together with its headroom (the
//! number of redundant sign bits of its worst-case element). Every operator is split in two:
//!
//! * a *prepare* step ([`prepare`]) which, from exponents and headrooms alone, picks the operand
//!   shifts and output exponent that keep the result in range while losing as little precision as
//!   possible, and
//! * an *apply* step ([`vect`]) which runs the element-wise kernel with those shifts and returns
//!   the exact headroom of the result.
//!
//! The [`bfp`] types bundle the two steps behind methods that keep `exp` and `hr` up to date, and
//! [`fft`] provides in-place DIT/DIF transforms with dynamic per-stage rescaling plus the packing
//! helpers needed for real-signal FFTs.

pub mod bfp;
pub mod error;
pub mod fft;
pub mod prepare;
pub mod scalar;
pub mod traits;
pub mod vect;
pub mod vpu;

pub use bfp::{BfpComplexS16, BfpComplexS32, BfpS16, BfpS32};
pub use error::{BfpError, Result};
pub use prepare::Saturation;
pub use scalar::{FloatComplexS32, FloatComplexS64, FloatS32, FloatS64};
pub use vpu::{Exponent, Headroom, LeftShift, RightShift};

/// Log2 of the largest supported FFT length. The twiddle table is sized from this.
pub const MAX_FFT_LOG2: u32 = 10;
pub const MAX_FFT_LENGTH: usize = 1 << MAX_FFT_LOG2;
/// The radix-4 first (DIT) or last (DIF) pass needs at least four points.
pub const MIN_FFT_LENGTH: usize = 4;
/// A real FFT of length `N` runs an `N/2` point complex FFT.
pub const MIN_MONO_FFT_LENGTH: usize = 2 * MIN_FFT_LENGTH;

pub const SQRT_MAX_DEPTH_S16: u32 = 15;
pub const SQRT_MAX_DEPTH_S32: u32 = 31;

/// Number of result bits computed by [`BfpS16::sqrt`].
pub const SQRT_DEPTH_S16: u32 = SQRT_MAX_DEPTH_S16;
/// Number of result bits computed by [`BfpS32::sqrt`].
pub const SQRT_DEPTH_S32: u32 = SQRT_MAX_DEPTH_S32;
