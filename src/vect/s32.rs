//! 32-bit arithmetic kernels. Products are normalised by 30 bits.

use super::headroom;
use crate::vpu::{
    sat32, sat40, vladd32, vlashr32, vlmacc32, vlmul32, vlsub32, Headroom, RightShift,
    VPU_INT32_MAX,
};

/// `a = (a >> b_shr) * (c >> c_shr) >> 30`, rounding and saturating.
pub fn mul(a: &mut [i32], c: &[i32], b_shr: RightShift, c_shr: RightShift) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        *x = vlmul32(vlashr32(*x, b_shr), vlashr32(y, c_shr));
    }
    headroom(a)
}

/// `a = (a >> b_shr) * (alpha >> c_shr) >> 30`.
pub fn scale(a: &mut [i32], alpha: i32, b_shr: RightShift, c_shr: RightShift) -> Headroom {
    let alpha = vlashr32(alpha, c_shr);
    for x in a.iter_mut() {
        *x = vlmul32(vlashr32(*x, b_shr), alpha);
    }
    headroom(a)
}

/// Exact sum in a 40-bit saturating accumulator.
pub fn sum(b: &[i32]) -> i64 {
    b.iter().fold(0i64, |acc, &x| sat40(acc + x as i64))
}

pub fn abs_sum(b: &[i32]) -> i64 {
    b.iter().fold(0i64, |acc, &x| sat40(acc + (x as i64).abs()))
}

/// Sum of Q30 products in the 40-bit accumulator.
pub fn dot(b: &[i32], c: &[i32], b_shr: RightShift, c_shr: RightShift) -> i64 {
    debug_assert_eq!(b.len(), c.len());
    b.iter().zip(c).fold(0i64, |acc, (&x, &y)| {
        vlmacc32(acc, vlashr32(x, b_shr), vlashr32(y, c_shr))
    })
}

pub fn energy(b: &[i32], b_shr: RightShift) -> i64 {
    b.iter().fold(0i64, |acc, &x| {
        let v = vlashr32(x, b_shr);
        vlmacc32(acc, v, v)
    })
}

/// Square root of `a >> b_shr`, one result bit per `depth` step starting from bit 30.
///
/// The result `r` satisfies `r * r <= x << 30`. Negative inputs produce zero.
pub fn sqrt(a: &mut [i32], b_shr: RightShift, depth: u32) -> Headroom {
    let depth = depth.min(crate::SQRT_MAX_DEPTH_S32);
    for x in a.iter_mut() {
        let v = vlashr32(*x, b_shr);
        *x = if v <= 0 {
            0
        } else {
            let target = (v as u64) << 30;
            let mut root = 0u64;
            for bit in (31 - depth..31).rev() {
                let trial = root | (1 << bit);
                if trial * trial <= target {
                    root = trial;
                }
            }
            root as i32
        };
    }
    headroom(a)
}

/// `a = 2^scale / a`. Zero elements saturate to `VPU_INT32_MAX`.
pub fn inverse(a: &mut [i32], scale: u32) -> Headroom {
    let dividend = 1i64 << scale.min(62);
    for x in a.iter_mut() {
        *x = if *x == 0 {
            VPU_INT32_MAX
        } else {
            sat32(dividend / *x as i64)
        };
    }
    headroom(a)
}

/// `acc = (acc >> acc_shr) + (b >> b_shr) * (c >> c_shr) >> 30`.
pub fn macc(
    acc: &mut [i32],
    b: &[i32],
    c: &[i32],
    acc_shr: RightShift,
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(acc.len(), b.len());
    debug_assert_eq!(b.len(), c.len());
    for ((x, &p), &q) in acc.iter_mut().zip(b).zip(c) {
        let product = vlmul32(vlashr32(p, b_shr), vlashr32(q, c_shr));
        *x = vladd32(vlashr32(*x, acc_shr), product);
    }
    headroom(acc)
}

pub fn nmacc(
    acc: &mut [i32],
    b: &[i32],
    c: &[i32],
    acc_shr: RightShift,
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(acc.len(), b.len());
    debug_assert_eq!(b.len(), c.len());
    for ((x, &p), &q) in acc.iter_mut().zip(b).zip(c) {
        let product = vlmul32(vlashr32(p, b_shr), vlashr32(q, c_shr));
        *x = vlsub32(vlashr32(*x, acc_shr), product);
    }
    headroom(acc)
}

/// Widens 16-bit mantissas by 8 bits. Exact.
pub fn from_s16(a: &mut [i32], b: &[i16]) -> Headroom {
    debug_assert_eq!(a.len(), b.len());
    for (x, &y) in a.iter_mut().zip(b) {
        *x = (y as i32) << 8;
    }
    headroom(a)
}
