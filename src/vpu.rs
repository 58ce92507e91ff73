//! Scalar model of the vector processing unit.
//!
//! These are the per-lane primitives every kernel is built from. Saturation is symmetric: the most
//! negative representable value of each width is never produced, so negation is always exact.

use num::Complex;

/// Power-of-two scale shared by every element of a BFP vector.
pub type Exponent = i32;
/// Redundant sign bits of the worst-case element of a mantissa array.
pub type Headroom = u32;
/// Arithmetic right shift amount. Negative values shift left (with saturation).
pub type RightShift = i32;
/// Arithmetic left shift amount. Negative values shift right.
pub type LeftShift = i32;

pub const VPU_INT16_MAX: i16 = 0x7FFF;
pub const VPU_INT16_MIN: i16 = -0x7FFF;
pub const VPU_INT32_MAX: i32 = 0x7FFF_FFFF;
pub const VPU_INT32_MIN: i32 = -0x7FFF_FFFF;
/// Bounds of the 40-bit accumulator used by 32-bit multiply-accumulate.
pub const VPU_INT40_MAX: i64 = 0x7F_FFFF_FFFF;
pub const VPU_INT40_MIN: i64 = -0x7F_FFFF_FFFF;

pub const ONE_Q14: i16 = 0x4000;
pub const ONE_Q30: i32 = 0x4000_0000;

/// Count of leading sign bits, including the sign bit itself.
#[inline(always)]
pub fn cls_s16(x: i16) -> u32 {
    if x >= 0 {
        x.leading_zeros()
    } else {
        x.leading_ones()
    }
}

#[inline(always)]
pub fn cls_s32(x: i32) -> u32 {
    if x >= 0 {
        x.leading_zeros()
    } else {
        x.leading_ones()
    }
}

#[inline(always)]
pub fn cls_s64(x: i64) -> u32 {
    if x >= 0 {
        x.leading_zeros()
    } else {
        x.leading_ones()
    }
}

/// Headroom of a single 16-bit value. `hr_s16(0) == hr_s16(-1) == 15`.
#[inline(always)]
pub fn hr_s16(x: i16) -> Headroom {
    cls_s16(x) - 1
}

#[inline(always)]
pub fn hr_s32(x: i32) -> Headroom {
    cls_s32(x) - 1
}

#[inline(always)]
pub fn hr_s64(x: i64) -> Headroom {
    cls_s64(x) - 1
}

#[inline(always)]
pub fn sat16(v: i64) -> i16 {
    v.clamp(VPU_INT16_MIN as i64, VPU_INT16_MAX as i64) as i16
}

#[inline(always)]
pub fn sat32(v: i64) -> i32 {
    v.clamp(VPU_INT32_MIN as i64, VPU_INT32_MAX as i64) as i32
}

#[inline(always)]
pub fn sat40(v: i64) -> i64 {
    v.clamp(VPU_INT40_MIN, VPU_INT40_MAX)
}

/// Rounding arithmetic right shift: rounds to nearest, ties toward positive infinity.
/// Non-positive shifts leave the value unchanged.
#[inline(always)]
pub fn round_shr(v: i64, shr: RightShift) -> i64 {
    if shr <= 0 {
        v
    } else {
        let shr = shr.min(64);
        ((v >> (shr - 1)) + 1) >> 1
    }
}

/// Left shift that clamps to the `i64` range instead of overflowing.
#[inline(always)]
pub(crate) fn shl_sat_i64(v: i64, shl: u32) -> i64 {
    if v == 0 {
        return 0;
    }
    if shl >= 63 {
        return if v > 0 { i64::MAX } else { i64::MIN };
    }
    let wide = (v as i128) << shl;
    wide.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Truncating arithmetic shift of a wide value, then 16-bit saturation.
#[inline(always)]
pub fn ashr16(v: i64, shr: RightShift) -> i16 {
    if shr >= 0 {
        sat16(v >> shr.min(63))
    } else {
        sat16(shl_sat_i64(v, shr.unsigned_abs()))
    }
}

/// Truncating arithmetic shift of a wide value, then 32-bit saturation.
#[inline(always)]
pub fn ashr32(v: i64, shr: RightShift) -> i32 {
    if shr >= 0 {
        sat32(v >> shr.min(63))
    } else {
        sat32(shl_sat_i64(v, shr.unsigned_abs()))
    }
}

#[inline(always)]
pub fn vlashr16(x: i16, shr: RightShift) -> i16 {
    if shr >= 16 {
        if x >= 0 {
            0
        } else {
            -1
        }
    } else if shr <= -16 && x != 0 {
        if x >= 0 {
            VPU_INT16_MAX
        } else {
            VPU_INT16_MIN
        }
    } else {
        ashr16(x as i64, shr)
    }
}

#[inline(always)]
pub fn vlashr32(x: i32, shr: RightShift) -> i32 {
    if shr >= 32 {
        if x >= 0 {
            0
        } else {
            -1
        }
    } else if shr <= -32 && x != 0 {
        if x >= 0 {
            VPU_INT32_MAX
        } else {
            VPU_INT32_MIN
        }
    } else {
        ashr32(x as i64, shr)
    }
}

#[inline(always)]
pub fn vladd16(a: i16, b: i16) -> i16 {
    sat16(a as i64 + b as i64)
}

#[inline(always)]
pub fn vlsub16(a: i16, b: i16) -> i16 {
    sat16(a as i64 - b as i64)
}

#[inline(always)]
pub fn vladd32(a: i32, b: i32) -> i32 {
    sat32(a as i64 + b as i64)
}

#[inline(always)]
pub fn vlsub32(a: i32, b: i32) -> i32 {
    sat32(a as i64 - b as i64)
}

/// Q14 multiply: `(x * y) >> 14` with rounding and saturation.
#[inline(always)]
pub fn vlmul16(x: i16, y: i16) -> i16 {
    sat16(round_shr(x as i64 * y as i64, 14))
}

/// Q30 multiply: `(x * y) >> 30` with rounding and saturation.
#[inline(always)]
pub fn vlmul32(x: i32, y: i32) -> i32 {
    sat32(round_shr(x as i64 * y as i64, 30))
}

/// 16-bit multiply-accumulate into a 32-bit accumulator.
#[inline(always)]
pub fn vlmacc16(acc: i32, x: i16, y: i16) -> i32 {
    sat32(acc as i64 + x as i64 * y as i64)
}

/// 32-bit multiply-accumulate of the rounded Q30 product into a 40-bit accumulator.
#[inline(always)]
pub fn vlmacc32(acc: i64, x: i32, y: i32) -> i64 {
    sat40(acc + round_shr(x as i64 * y as i64, 30))
}

/// Rounding right shift of a 32-bit accumulator down to 16 bits.
#[inline(always)]
pub fn vlsat16(acc: i32, sat: u32) -> i16 {
    if sat >= 32 {
        return if acc >= 0 { 0 } else { -1 };
    }
    sat16(round_shr(acc as i64, sat as i32))
}

/// Rounding right shift of a 40-bit accumulator down to 32 bits.
#[inline(always)]
pub fn vlsat32(acc: i64, sat: u32) -> i32 {
    if sat >= 39 {
        return if acc >= 0 { 0 } else { -1 };
    }
    sat32(round_shr(acc, sat as i32))
}

/// `+1` or `-1` in Q14. Zero counts as positive.
#[inline(always)]
pub fn vsign16(x: i16) -> i16 {
    if x >= 0 {
        ONE_Q14
    } else {
        -ONE_Q14
    }
}

/// `+1` or `-1` in Q30. Zero counts as positive.
#[inline(always)]
pub fn vsign32(x: i32) -> i32 {
    if x >= 0 {
        ONE_Q30
    } else {
        -ONE_Q30
    }
}

#[inline(always)]
pub fn vpos16(x: i16) -> i16 {
    x.max(0)
}

#[inline(always)]
pub fn vpos32(x: i32) -> i32 {
    x.max(0)
}

/// Rounds a 32-bit value to its upper 16 bits.
#[inline(always)]
pub fn vdepth16_32(x: i32) -> i16 {
    sat16(round_shr(x as i64, 16))
}

/// Real part of `d * c` with both products in Q30.
#[inline(always)]
pub fn vcmr32(d: Complex<i32>, c: Complex<i32>) -> i32 {
    let a = round_shr(d.re as i64 * c.re as i64, 30);
    let b = round_shr(d.im as i64 * c.im as i64, 30);
    sat32(a - b)
}

/// Imaginary part of `d * c` with both products in Q30.
#[inline(always)]
pub fn vcmi32(d: Complex<i32>, c: Complex<i32>) -> i32 {
    let a = round_shr(d.re as i64 * c.im as i64, 30);
    let b = round_shr(d.im as i64 * c.re as i64, 30);
    sat32(a + b)
}

/// Real part of `d * conj(c)`.
#[inline(always)]
pub fn vcmcr32(d: Complex<i32>, c: Complex<i32>) -> i32 {
    let a = round_shr(d.re as i64 * c.re as i64, 30);
    let b = round_shr(d.im as i64 * c.im as i64, 30);
    sat32(a + b)
}

/// Imaginary part of `d * conj(c)`.
#[inline(always)]
pub fn vcmci32(d: Complex<i32>, c: Complex<i32>) -> i32 {
    let a = round_shr(d.re as i64 * c.im as i64, 30);
    let b = round_shr(d.im as i64 * c.re as i64, 30);
    sat32(b - a)
}

/// Smallest `k` such that `2^k >= n`. Returns 0 for `n <= 1`.
#[inline(always)]
pub fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}
