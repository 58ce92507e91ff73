//! 16-bit arithmetic kernels.

use super::headroom;
use crate::vpu::{
    ashr16, round_shr, sat16, sat32, vladd16, vlashr16, vlmacc16, vlsat16, vlsub16, Headroom,
    RightShift, VPU_INT16_MAX,
};

/// `a = round(a * c >> a_shr)`, saturating.
pub fn mul(a: &mut [i16], c: &[i16], a_shr: RightShift) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        *x = sat16(round_shr(*x as i64 * y as i64, a_shr));
    }
    headroom(a)
}

/// `a = round(a * alpha >> a_shr)`, saturating.
pub fn scale(a: &mut [i16], alpha: i16, a_shr: RightShift) -> Headroom {
    for x in a.iter_mut() {
        *x = sat16(round_shr(*x as i64 * alpha as i64, a_shr));
    }
    headroom(a)
}

/// Exact sum, returned with 32-bit saturation.
pub fn sum(b: &[i16]) -> i32 {
    sat32(b.iter().map(|&x| x as i64).sum())
}

pub fn abs_sum(b: &[i16]) -> i32 {
    sat32(b.iter().map(|&x| (x as i64).abs()).sum())
}

/// Sum of full products of the shifted operands, returned with 32-bit saturation.
pub fn dot(b: &[i16], c: &[i16], b_shr: RightShift, c_shr: RightShift) -> i32 {
    debug_assert_eq!(b.len(), c.len());
    let acc: i64 = b
        .iter()
        .zip(c)
        .map(|(&x, &y)| vlashr16(x, b_shr) as i64 * vlashr16(y, c_shr) as i64)
        .sum();
    sat32(acc)
}

/// Exact sum of squares of the shifted input.
pub fn energy(b: &[i16], b_shr: RightShift) -> i64 {
    b.iter()
        .map(|&x| {
            let v = vlashr16(x, b_shr) as i64;
            v * v
        })
        .sum()
}

/// Square root of `a >> b_shr`, one result bit per `depth` step starting from bit 14.
///
/// The result `r` satisfies `r * r <= x << 14`. Negative inputs produce zero.
pub fn sqrt(a: &mut [i16], b_shr: RightShift, depth: u32) -> Headroom {
    let depth = depth.min(crate::SQRT_MAX_DEPTH_S16);
    for x in a.iter_mut() {
        let v = vlashr16(*x, b_shr);
        *x = if v <= 0 {
            0
        } else {
            let target = (v as u64) << 14;
            let mut root = 0u64;
            for bit in (15 - depth..15).rev() {
                let trial = root | (1 << bit);
                if trial * trial <= target {
                    root = trial;
                }
            }
            root as i16
        };
    }
    headroom(a)
}

/// `a = 2^scale / a`. Zero elements saturate to `VPU_INT16_MAX`.
pub fn inverse(a: &mut [i16], scale: u32) -> Headroom {
    let dividend = 1i64 << scale;
    for x in a.iter_mut() {
        *x = if *x == 0 {
            VPU_INT16_MAX
        } else {
            sat16(dividend / *x as i64)
        };
    }
    headroom(a)
}

/// `acc = (acc >> acc_shr) + round(b * c >> bc_shr)`.
pub fn macc(
    acc: &mut [i16],
    b: &[i16],
    c: &[i16],
    acc_shr: RightShift,
    bc_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(acc.len(), b.len());
    debug_assert_eq!(b.len(), c.len());
    let sat = bc_shr.max(0) as u32;
    for ((x, &p), &q) in acc.iter_mut().zip(b).zip(c) {
        let product = vlsat16(vlmacc16(0, p, q), sat);
        *x = vladd16(vlashr16(*x, acc_shr), product);
    }
    headroom(acc)
}

/// `acc = (acc >> acc_shr) - round(b * c >> bc_shr)`.
pub fn nmacc(
    acc: &mut [i16],
    b: &[i16],
    c: &[i16],
    acc_shr: RightShift,
    bc_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(acc.len(), b.len());
    debug_assert_eq!(b.len(), c.len());
    let sat = bc_shr.max(0) as u32;
    for ((x, &p), &q) in acc.iter_mut().zip(b).zip(c) {
        let product = vlsat16(vlmacc16(0, p, q), sat);
        *x = vlsub16(vlashr16(*x, acc_shr), product);
    }
    headroom(acc)
}

/// Narrows 32-bit mantissas, rounding on right shifts.
pub fn from_s32(a: &mut [i16], b: &[i32], b_shr: RightShift) -> Headroom {
    debug_assert_eq!(a.len(), b.len());
    for (x, &y) in a.iter_mut().zip(b) {
        *x = if b_shr > 0 {
            sat16(round_shr(y as i64, b_shr))
        } else {
            ashr16(y as i64, b_shr)
        };
    }
    headroom(a)
}
