use super::{
    BinaryShifts, ClipParams, InverseScale, Macc16Shifts, Macc32Shifts, ProductShift, Saturation,
    UnaryShift,
};
use crate::vpu::{
    ceil_log2, hr_s16, hr_s32, sat16, sat32, shl_sat_i64, vlmul16, vlmul32, vsign16, vsign32,
    Exponent, Headroom, RightShift, VPU_INT16_MAX, VPU_INT32_MAX,
};

/// Shifts for element-wise addition or subtraction.
///
/// Both operands are brought to the exponent that leaves one bit of headroom for the carry. When
/// saturation must be avoided and both operands would hit that exponent exactly, a second bit is
/// given up, since `-2^W + -2^W` would otherwise land on the unrepresentable bound.
pub fn add_sub(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
    saturation: Saturation,
) -> BinaryShifts {
    let b_min_exp = b_exp - b_hr as i32;
    let c_min_exp = c_exp - c_hr as i32;

    let mut a_exp = b_min_exp.max(c_min_exp) + 1;
    if b_min_exp == c_min_exp && !saturation.is_allowed() {
        a_exp += 1;
    }

    BinaryShifts {
        a_exp,
        b_shr: a_exp - b_exp,
        c_shr: a_exp - c_exp,
    }
}

/// Aligns two operands to a common exponent leaving `extra_hr` bits of headroom in the worse one.
///
/// Used by element-wise max/min, whose outputs are one of the aligned inputs.
pub fn two_vec(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
    extra_hr: Headroom,
) -> BinaryShifts {
    let extra = extra_hr as i32;
    let a_exp = (b_exp - b_hr as i32 + extra).max(c_exp - c_hr as i32 + extra);

    BinaryShifts {
        a_exp,
        b_shr: a_exp - b_exp,
        c_shr: a_exp - c_exp,
    }
}

/// Element-wise 16-bit multiply. The full 30-bit product is shifted down by `a_shr`.
pub fn s16_mul(b_exp: Exponent, c_exp: Exponent, b_hr: Headroom, c_hr: Headroom) -> ProductShift {
    let total_hr = (b_hr + c_hr) as i32;
    let a_shr = (16 - total_hr).max(0);
    ProductShift {
        a_exp: b_exp + c_exp + a_shr,
        a_shr,
    }
}

/// 16-bit multiply by a scalar. Only `(-2^15) * (-2^15)` can saturate under [`Saturation::Allow`].
pub fn s16_scale(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
    saturation: Saturation,
) -> ProductShift {
    let total_hr = (b_hr + c_hr) as i32;
    let bits = if saturation.is_allowed() { 15 } else { 16 };
    let a_shr = (bits - total_hr).max(0);
    ProductShift {
        a_exp: b_exp + c_exp + a_shr,
        a_shr,
    }
}

/// Element-wise 32-bit multiply (also used for scalar scaling).
///
/// The VPU normalises every product by 30 bits. Operand shifts are chosen so the product keeps
/// one bit of headroom, taking bits from whichever operand has headroom to spare.
pub fn s32_mul(b_exp: Exponent, c_exp: Exponent, b_hr: Headroom, c_hr: Headroom) -> BinaryShifts {
    let total_hr = (b_hr + c_hr) as i32;
    let (b_shr, c_shr) = if total_hr == 0 {
        (1, 1)
    } else if total_hr == 1 {
        (i32::from(b_hr == 0), i32::from(c_hr == 0))
    } else if b_hr == 0 {
        (0, 2 - total_hr)
    } else if c_hr == 0 {
        (2 - total_hr, 0)
    } else {
        (1 - b_hr as i32, 1 - c_hr as i32)
    };

    BinaryShifts {
        a_exp: b_exp + c_exp + b_shr + c_shr + 30,
        b_shr,
        c_shr,
    }
}

/// 16-bit dot product, accumulated over full products.
///
/// `length` elements of worst-case magnitude need `ceil(log2(length))` extra bits. A non power of
/// two length already overestimates, which buys back the bit reserved against saturation.
pub fn s16_dot(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
    length: usize,
    saturation: Saturation,
) -> BinaryShifts {
    let k = ceil_log2(length) as i32;
    let t = i32::from(saturation.is_allowed() || !length.is_power_of_two());
    let total_hr = (b_hr + c_hr) as i32;
    let total_shr = k - t - total_hr;

    let (b_shr, c_shr) = if total_shr <= 0 {
        (0, 0)
    } else {
        (total_shr >> 1, total_shr - (total_shr >> 1))
    };

    BinaryShifts {
        a_exp: b_exp + c_exp + b_shr + c_shr,
        b_shr,
        c_shr,
    }
}

/// 32-bit dot product into the 40-bit accumulator.
///
/// Operands are first normalised (all headroom removed). Any extra shift the length demands is
/// taken from `b` first, up to its original headroom, then from `c`.
pub fn s32_dot(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
    length: usize,
    saturation: Saturation,
) -> BinaryShifts {
    let k = ceil_log2(length) as i32;
    let t = i32::from(saturation.is_allowed() || !length.is_power_of_two());
    let total_hr = (b_hr + c_hr) as i32;
    let mut total_shr = k - t - 6;

    let mut b_shr = -(b_hr as i32);
    let mut c_shr = -(c_hr as i32);

    if total_shr < 0 {
        // Already normalised, nothing to add.
    } else if total_shr >= total_hr {
        b_shr += b_hr as i32;
        c_shr += c_hr as i32;
        total_shr -= total_hr;
        b_shr += total_shr >> 1;
        c_shr += total_shr - (total_shr >> 1);
    } else {
        let from_b = (b_hr as i32).min(total_shr);
        b_shr += from_b;
        c_shr += total_shr - from_b;
    }

    BinaryShifts {
        a_exp: b_exp + c_exp + b_shr + c_shr + 30,
        b_shr,
        c_shr,
    }
}

fn sqrt_shift(b_exp: Exponent, b_hr: Headroom, frac_bits: i32) -> UnaryShift {
    let mut b_shr = -(b_hr as i32);
    if (b_exp + b_shr) & 1 != 0 {
        b_shr += 1;
    }
    UnaryShift {
        a_exp: (b_exp + b_shr - frac_bits) >> 1,
        b_shr,
    }
}

/// Normalises the input while keeping its exponent even, so the root's exponent is exact.
pub fn s16_sqrt(b_exp: Exponent, b_hr: Headroom) -> UnaryShift {
    sqrt_shift(b_exp, b_hr, 14)
}

pub fn s32_sqrt(b_exp: Exponent, b_hr: Headroom) -> UnaryShift {
    sqrt_shift(b_exp, b_hr, 30)
}

/// Scale for 16-bit reciprocals, chosen from the smallest-magnitude element.
pub fn s16_inverse(b: &[i16], b_exp: Exponent) -> InverseScale {
    let min_abs = b
        .iter()
        .fold(VPU_INT16_MAX, |acc, &x| acc.min(vlmul16(x, vsign16(x))));
    let hr = hr_s16(min_abs) as i32;
    let shr = 2 + hr;

    InverseScale {
        a_exp: shr - b_exp - 30,
        scale: (28 - hr) as u32,
    }
}

/// Scale for 32-bit reciprocals. Results land between `2^29` and `2^30`.
pub fn s32_inverse(b: &[i32], b_exp: Exponent) -> InverseScale {
    let min_abs = b
        .iter()
        .fold(VPU_INT32_MAX, |acc, &x| acc.min(vlmul32(x, vsign32(x))));
    let k = 60 - hr_s32(min_abs) as i32;

    InverseScale {
        a_exp: -b_exp - k,
        scale: k as u32,
    }
}

/// 32-bit energy. Squares are accumulated in 40 bits, so up to 128 worst-case terms fit
/// without any shift beyond normalisation. Longer inputs give up one bit per factor of four in
/// length, rounded up so the accumulator cannot saturate.
pub fn s32_energy(b_exp: Exponent, b_hr: Headroom, length: usize) -> UnaryShift {
    let hr = b_hr as i32;
    let b_shr = (((ceil_log2(length) as i32 - 5) >> 1) - hr).max(-hr);
    UnaryShift {
        a_exp: 2 * (b_exp + b_shr) + 30,
        b_shr,
    }
}

/// 16-bit multiply-accumulate. Both the accumulator and the shifted product end up with one bit
/// of headroom at the common exponent.
pub fn s16_macc(
    acc_exp: Exponent,
    b_exp: Exponent,
    c_exp: Exponent,
    acc_hr: Headroom,
    b_hr: Headroom,
    c_hr: Headroom,
) -> Macc16Shifts {
    macc16_with_bits(acc_exp, b_exp, c_exp, acc_hr, b_hr, c_hr, 16)
}

pub(crate) fn macc16_with_bits(
    acc_exp: Exponent,
    b_exp: Exponent,
    c_exp: Exponent,
    acc_hr: Headroom,
    b_hr: Headroom,
    c_hr: Headroom,
    product_bits: i32,
) -> Macc16Shifts {
    let bc_hr = (b_hr + c_hr) as i32;
    let bc_exp = b_exp + c_exp - bc_hr + product_bits;
    let tmp_exp = acc_exp - acc_hr as i32 + 1;
    let a_exp = bc_exp.max(tmp_exp);

    Macc16Shifts {
        a_exp,
        acc_shr: a_exp - acc_exp,
        bc_shr: product_bits - bc_hr + (a_exp - bc_exp),
    }
}

/// 32-bit multiply-accumulate. Any shift needed beyond normalisation is split evenly with the
/// odd bit going to `c`.
pub fn s32_macc(
    acc_exp: Exponent,
    b_exp: Exponent,
    c_exp: Exponent,
    acc_hr: Headroom,
    b_hr: Headroom,
    c_hr: Headroom,
) -> Macc32Shifts {
    macc32_with_bits(acc_exp, b_exp, c_exp, acc_hr, b_hr, c_hr, 1)
}

pub(crate) fn macc32_with_bits(
    acc_exp: Exponent,
    b_exp: Exponent,
    c_exp: Exponent,
    acc_hr: Headroom,
    b_hr: Headroom,
    c_hr: Headroom,
    c_extra: i32,
) -> Macc32Shifts {
    let mut b_shr = 1 - b_hr as i32;
    let mut c_shr = c_extra - c_hr as i32;

    let p_exp = b_exp + c_exp - (b_hr + c_hr) as i32 + 31 + c_extra;
    let d_exp = acc_exp - acc_hr as i32 + 1;
    let a_exp = d_exp.max(p_exp);

    let p_shr = a_exp - p_exp;
    b_shr += p_shr >> 1;
    c_shr += p_shr - (p_shr >> 1);

    Macc32Shifts {
        a_exp,
        acc_shr: a_exp - acc_exp,
        b_shr,
        c_shr,
    }
}

fn clip_bounds(
    b_exp: Exponent,
    bound_exp: Exponent,
    lower: i64,
    upper: i64,
    saturate: impl Fn(i64) -> i64,
) -> (Exponent, i64, i64) {
    let bound_shr = b_exp - bound_exp;

    if bound_shr < 0 {
        let shl = bound_shr.unsigned_abs();
        (
            b_exp,
            saturate(shl_sat_i64(lower, shl)),
            saturate(shl_sat_i64(upper, shl)),
        )
    } else {
        let shr = bound_shr.min(62);
        let lower = lower.saturating_add((1i64 << shr) - 1) >> shr;
        (b_exp, lower, upper >> shr)
    }
}

/// Converts 16-bit clip bounds to the exponent of `b`.
///
/// When the bounds leave no room for any element of `b` (the upper bound saturates negative, or
/// the lower bound saturates positive), `a_exp` is reported as `bound_exp` instead.
pub fn s16_clip(
    b_exp: Exponent,
    bound_exp: Exponent,
    lower: i16,
    upper: i16,
) -> ClipParams<i16> {
    let (mut a_exp, lb, ub) = clip_bounds(b_exp, bound_exp, lower.into(), upper.into(), |v| {
        sat16(v).into()
    });
    let (lb, ub) = (sat16(lb), sat16(ub));
    if ub == crate::vpu::VPU_INT16_MIN || lb == VPU_INT16_MAX {
        a_exp = bound_exp;
    }
    ClipParams {
        a_exp,
        b_shr: 0,
        lower: lb,
        upper: ub,
    }
}

pub fn s32_clip(
    b_exp: Exponent,
    bound_exp: Exponent,
    lower: i32,
    upper: i32,
) -> ClipParams<i32> {
    let (mut a_exp, lb, ub) = clip_bounds(b_exp, bound_exp, lower.into(), upper.into(), |v| {
        sat32(v).into()
    });
    let (lb, ub) = (sat32(lb), sat32(ub));
    if ub == crate::vpu::VPU_INT32_MIN || lb == VPU_INT32_MAX {
        a_exp = bound_exp;
    }
    ClipParams {
        a_exp,
        b_shr: 0,
        lower: lb,
        upper: ub,
    }
}

/// Shift for narrowing 32-bit mantissas to 16 bits.
pub fn s32_to_s16(b_exp: Exponent, b_hr: Headroom, saturation: Saturation) -> UnaryShift {
    let mut b_shr: RightShift = 16 - b_hr as i32;
    if !saturation.is_allowed() {
        b_shr += 1;
    }
    UnaryShift {
        a_exp: b_exp + b_shr,
        b_shr,
    }
}

/// Widening is exact: every mantissa moves up by 8 bits, leaving 8 bits of headroom on top.
pub fn s16_to_s32(b_exp: Exponent) -> UnaryShift {
    UnaryShift {
        a_exp: b_exp - 8,
        b_shr: -8,
    }
}
