//! Scalar mantissa/exponent values returned by reductions, and the scalar arithmetic used to
//! finish statistics such as the RMS.

use num::Complex;

use crate::vpu::{hr_s32, hr_s64, Exponent};

/// A 32-bit mantissa with its exponent: `mant * 2^exp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatS32 {
    pub mant: i32,
    pub exp: Exponent,
}

/// A 64-bit mantissa with its exponent. Used for wide accumulations (sums, dot products, energy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatS64 {
    pub mant: i64,
    pub exp: Exponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatComplexS32 {
    pub re: i32,
    pub im: i32,
    pub exp: Exponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatComplexS64 {
    pub re: i64,
    pub im: i64,
    pub exp: Exponent,
}

/// Exponent that puts the largest magnitude `max_abs` just below `2^(bits - 2)` after scaling, so
/// the mantissa keeps one bit of headroom.
pub(crate) fn exponent_for(max_abs: f64, bits: u32) -> Exponent {
    if max_abs == 0.0 || !max_abs.is_finite() {
        return 0;
    }
    max_abs.log2().floor() as i32 - (bits as i32 - 3)
}

#[inline(always)]
pub(crate) fn ldexp(mant: f64, exp: Exponent) -> f64 {
    mant * 2f64.powi(exp)
}

impl FloatS32 {
    pub fn new(mant: i32, exp: Exponent) -> Self {
        Self { mant, exp }
    }

    pub fn from_f64(value: f64) -> Self {
        let exp = exponent_for(value.abs(), 32);
        Self {
            mant: crate::vpu::sat32(ldexp(value, -exp).round() as i64),
            exp,
        }
    }

    pub fn to_f64(self) -> f64 {
        ldexp(self.mant as f64, self.exp)
    }
}

impl FloatS64 {
    pub fn new(mant: i64, exp: Exponent) -> Self {
        Self { mant, exp }
    }

    pub fn to_f64(self) -> f64 {
        ldexp(self.mant as f64, self.exp)
    }
}

impl FloatComplexS32 {
    pub fn to_f64(self) -> Complex<f64> {
        Complex::new(ldexp(self.re as f64, self.exp), ldexp(self.im as f64, self.exp))
    }
}

impl FloatComplexS64 {
    pub fn to_f64(self) -> Complex<f64> {
        Complex::new(ldexp(self.re as f64, self.exp), ldexp(self.im as f64, self.exp))
    }
}

/// Narrows a 64-bit value so it fits in 32 bits with no headroom left over.
pub fn s64_to_s32(b: FloatS64) -> FloatS32 {
    let shr = (32 - hr_s64(b.mant) as i32).max(0);
    FloatS32 {
        mant: (b.mant >> shr) as i32,
        exp: b.exp + shr,
    }
}

/// Product of two scalars, rounded to 32 bits.
pub fn s32_mul(b: FloatS32, c: FloatS32) -> FloatS32 {
    let mut p = b.mant as i64 * c.mant as i64;
    let p_shr = (32 - hr_s64(p) as i32).max(0);
    let mut exp = b.exp + c.exp + p_shr;

    if p_shr > 0 {
        p += 1i64 << (p_shr - 1);
    }
    p >>= p_shr;

    // Rounding can carry into the sign bit.
    if p == 0x8000_0000 {
        p >>= 1;
        exp += 1;
    }

    FloatS32 {
        mant: p as i32,
        exp,
    }
}

/// Reciprocal of a scalar. The result mantissa lies between `2^29` and `2^30` in magnitude.
/// Zero saturates.
pub fn s32_inverse(b: FloatS32) -> FloatS32 {
    let scale = 60 - hr_s32(b.mant);
    let mant = if b.mant == 0 {
        crate::vpu::VPU_INT32_MAX
    } else {
        crate::vpu::sat32((1i64 << scale) / b.mant as i64)
    };
    FloatS32 {
        mant,
        exp: -b.exp - scale as i32,
    }
}

/// Square root of a scalar, computing `depth` result bits.
pub fn s32_sqrt(b: FloatS32, depth: u32) -> FloatS32 {
    let p = crate::prepare::s32_sqrt(b.exp, hr_s32(b.mant));
    let mut mant = [b.mant];
    crate::vect::s32::sqrt(&mut mant, p.b_shr, depth);
    FloatS32 {
        mant: mant[0],
        exp: p.a_exp,
    }
}
