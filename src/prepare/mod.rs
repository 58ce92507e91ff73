//! Exponent and shift calculators.
//!
//! Every function here looks only at exponents, headrooms and (for accumulating operators) the
//! vector length. None of them touch mantissa data, except the inverse calculators which need the
//! smallest-magnitude element. The returned shifts are consumed by the matching kernel in
//! [`crate::vect`], and the returned exponent is the exponent of that kernel's output.

mod complex;
mod real;

pub use complex::*;
pub use real::*;

use crate::vpu::{Exponent, RightShift};

/// Whether an operator may reach the saturation bound of its output width.
///
/// `Avoid` costs one bit of precision in the operators that depend on it, in exchange for ruling
/// out saturation structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Saturation {
    Allow,
    Avoid,
}

impl Saturation {
    #[inline(always)]
    pub fn is_allowed(self) -> bool {
        matches!(self, Saturation::Allow)
    }
}

/// Output exponent plus one input shift per operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinaryShifts {
    pub a_exp: Exponent,
    pub b_shr: RightShift,
    pub c_shr: RightShift,
}

/// Output exponent plus the shift of a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnaryShift {
    pub a_exp: Exponent,
    pub b_shr: RightShift,
}

/// Output exponent plus the shift applied to the full-width product (16-bit multiplies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProductShift {
    pub a_exp: Exponent,
    pub a_shr: RightShift,
}

/// Output exponent and the power of two each element is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InverseScale {
    pub a_exp: Exponent,
    pub scale: u32,
}

/// Shifts for 16-bit multiply-accumulate: the accumulator shift and the product shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Macc16Shifts {
    pub a_exp: Exponent,
    pub acc_shr: RightShift,
    pub bc_shr: RightShift,
}

/// Shifts for 32-bit multiply-accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Macc32Shifts {
    pub a_exp: Exponent,
    pub acc_shr: RightShift,
    pub b_shr: RightShift,
    pub c_shr: RightShift,
}

/// Clip bounds converted to the exponent of the vector being clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipParams<T> {
    pub a_exp: Exponent,
    pub b_shr: RightShift,
    pub lower: T,
    pub upper: T,
}
