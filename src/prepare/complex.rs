use super::real::{macc16_with_bits, macc32_with_bits};
use super::{BinaryShifts, Macc16Shifts, Macc32Shifts, ProductShift, UnaryShift};
use crate::vpu::{ceil_log2, Exponent, Headroom};

/// Complex 16-bit multiply. Each output part sums two 30-bit products.
pub fn complex_s16_mul(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
) -> ProductShift {
    let a_shr = (16 - (b_hr + c_hr) as i32).max(0);
    ProductShift {
        a_exp: b_exp + c_exp + a_shr,
        a_shr,
    }
}

/// Complex 16-bit vector times real 16-bit vector.
pub fn complex_s16_real_mul(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
) -> ProductShift {
    let a_shr = (15 - (b_hr + c_hr) as i32).max(0);
    ProductShift {
        a_exp: b_exp + c_exp + a_shr,
        a_shr,
    }
}

pub fn complex_s16_squared_mag(b_exp: Exponent, b_hr: Headroom) -> ProductShift {
    let a_shr = (16 - 2 * b_hr as i32).max(0);
    ProductShift {
        a_exp: 2 * b_exp + a_shr,
        a_shr,
    }
}

/// Magnitude (either width). The input keeps one bit of headroom so the rotations cannot overflow.
pub fn complex_mag(b_exp: Exponent, b_hr: Headroom) -> UnaryShift {
    let b_shr = 1 - b_hr as i32;
    UnaryShift {
        a_exp: b_exp + b_shr,
        b_shr,
    }
}

/// Like [`crate::prepare::s16_macc`], with one more bit for the sum of two products.
pub fn complex_s16_macc(
    acc_exp: Exponent,
    b_exp: Exponent,
    c_exp: Exponent,
    acc_hr: Headroom,
    b_hr: Headroom,
    c_hr: Headroom,
) -> Macc16Shifts {
    macc16_with_bits(acc_exp, b_exp, c_exp, acc_hr, b_hr, c_hr, 17)
}

/// Complex 32-bit multiply. The total shift `2 - (b_hr + c_hr)` is split between the operands.
pub fn complex_s32_mul(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
) -> BinaryShifts {
    let total_shr = 2 - (b_hr + c_hr) as i32;

    let b_shr = if total_shr < 0 {
        total_shr.max(-(b_hr as i32))
    } else if b_hr <= c_hr {
        total_shr - (total_shr >> 1)
    } else {
        total_shr >> 1
    };
    let c_shr = total_shr - b_shr;

    BinaryShifts {
        a_exp: b_exp + c_exp + b_shr + c_shr + 30,
        b_shr,
        c_shr,
    }
}

/// Complex 32-bit vector times real 32-bit vector.
pub fn complex_s32_real_mul(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
) -> BinaryShifts {
    let mut b_shr = -(b_hr as i32);
    let mut c_shr = -(c_hr as i32);
    if b_hr > 0 {
        b_shr += 1;
    } else {
        c_shr += 1;
    }

    BinaryShifts {
        a_exp: b_exp + c_exp + b_shr + c_shr + 30,
        b_shr,
        c_shr,
    }
}

/// Complex 32-bit vector times a complex scalar. The vector is shifted first; only what it cannot
/// absorb is taken from the scalar.
pub fn complex_s32_scale(
    b_exp: Exponent,
    c_exp: Exponent,
    b_hr: Headroom,
    c_hr: Headroom,
) -> BinaryShifts {
    let mut b_shr = 2 - (b_hr + c_hr) as i32;
    let mut c_shr = 0;
    if b_shr < -(b_hr as i32) {
        c_shr = b_shr + b_hr as i32;
        b_shr = -(b_hr as i32);
    }

    BinaryShifts {
        a_exp: b_exp + c_exp + 30 + b_shr + c_shr,
        b_shr,
        c_shr,
    }
}

pub fn complex_s32_squared_mag(b_exp: Exponent, b_hr: Headroom) -> UnaryShift {
    let b_shr = 1 - b_hr as i32;
    UnaryShift {
        a_exp: 2 * (b_exp + b_shr) + 30,
        b_shr,
    }
}

pub fn complex_s32_macc(
    acc_exp: Exponent,
    b_exp: Exponent,
    c_exp: Exponent,
    acc_hr: Headroom,
    b_hr: Headroom,
    c_hr: Headroom,
) -> Macc32Shifts {
    macc32_with_bits(acc_exp, b_exp, c_exp, acc_hr, b_hr, c_hr, 2)
}

/// Sum of complex 32-bit elements into 40-bit accumulators. Up to `2^(8 + b_hr)` elements need no shift.
pub fn complex_s32_sum(b_exp: Exponent, b_hr: Headroom, length: usize) -> UnaryShift {
    let b_shr = (ceil_log2(length) as i32 - (8 + b_hr as i32)).max(0);
    UnaryShift {
        a_exp: b_exp + b_shr,
        b_shr,
    }
}
