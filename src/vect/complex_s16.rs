//! Complex 16-bit kernels. Real and imaginary parts live in separate arrays.

use num::Complex;

use super::headroom;
use crate::fft::tables::ROT_TABLE16;
use crate::vpu::{
    round_shr, sat16, vladd16, vlashr16, vlmacc16, vlmul16, vlsat16, vlsub16, vsign16,
    Headroom, LeftShift, RightShift, ONE_Q14,
};

/// Headroom of a complex vector: the smaller of its parts' headrooms.
pub fn complex_headroom(re: &[i16], im: &[i16]) -> Headroom {
    headroom(re).min(headroom(im))
}

pub fn shl(a_re: &mut [i16], a_im: &mut [i16], shl: LeftShift) -> Headroom {
    super::shl(a_re, shl).min(super::shl(a_im, shl))
}

pub fn add(
    a_re: &mut [i16],
    a_im: &mut [i16],
    c_re: &[i16],
    c_im: &[i16],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    super::add(a_re, c_re, b_shr, c_shr).min(super::add(a_im, c_im, b_shr, c_shr))
}

pub fn sub(
    a_re: &mut [i16],
    a_im: &mut [i16],
    c_re: &[i16],
    c_im: &[i16],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    super::sub(a_re, c_re, b_shr, c_shr).min(super::sub(a_im, c_im, b_shr, c_shr))
}

/// Complex vector times real vector.
pub fn real_mul(a_re: &mut [i16], a_im: &mut [i16], c: &[i16], a_shr: RightShift) -> Headroom {
    super::s16::mul(a_re, c, a_shr).min(super::s16::mul(a_im, c, a_shr))
}

pub fn real_scale(a_re: &mut [i16], a_im: &mut [i16], alpha: i16, a_shr: RightShift) -> Headroom {
    super::s16::scale(a_re, alpha, a_shr).min(super::s16::scale(a_im, alpha, a_shr))
}

#[inline(always)]
fn product(b: Complex<i64>, c: Complex<i64>, conj: bool) -> Complex<i64> {
    if conj {
        Complex::new(b.re * c.re + b.im * c.im, b.im * c.re - b.re * c.im)
    } else {
        Complex::new(b.re * c.re - b.im * c.im, b.re * c.im + b.im * c.re)
    }
}

fn mul_impl(
    a_re: &mut [i16],
    a_im: &mut [i16],
    c_re: &[i16],
    c_im: &[i16],
    a_shr: RightShift,
    conj: bool,
) -> Headroom {
    debug_assert_eq!(a_re.len(), a_im.len());
    debug_assert_eq!(a_re.len(), c_re.len());
    debug_assert_eq!(c_re.len(), c_im.len());
    for k in 0..a_re.len() {
        let b = Complex::new(a_re[k] as i64, a_im[k] as i64);
        let c = Complex::new(c_re[k] as i64, c_im[k] as i64);
        let p = product(b, c, conj);
        a_re[k] = sat16(round_shr(p.re, a_shr));
        a_im[k] = sat16(round_shr(p.im, a_shr));
    }
    complex_headroom(a_re, a_im)
}

/// `a = a * c`, products shifted down by `a_shr` with rounding.
pub fn mul(
    a_re: &mut [i16],
    a_im: &mut [i16],
    c_re: &[i16],
    c_im: &[i16],
    a_shr: RightShift,
) -> Headroom {
    mul_impl(a_re, a_im, c_re, c_im, a_shr, false)
}

/// `a = a * conj(c)`.
pub fn conj_mul(
    a_re: &mut [i16],
    a_im: &mut [i16],
    c_re: &[i16],
    c_im: &[i16],
    a_shr: RightShift,
) -> Headroom {
    mul_impl(a_re, a_im, c_re, c_im, a_shr, true)
}

/// `a = a * alpha` for a complex scalar.
pub fn scale(
    a_re: &mut [i16],
    a_im: &mut [i16],
    alpha: Complex<i16>,
    a_shr: RightShift,
) -> Headroom {
    let c = Complex::new(alpha.re as i64, alpha.im as i64);
    for (x_re, x_im) in a_re.iter_mut().zip(a_im.iter_mut()) {
        let p = product(Complex::new(*x_re as i64, *x_im as i64), c, false);
        *x_re = sat16(round_shr(p.re, a_shr));
        *x_im = sat16(round_shr(p.im, a_shr));
    }
    complex_headroom(a_re, a_im)
}

pub fn squared_mag(a: &mut [i16], b_re: &[i16], b_im: &[i16], a_shr: RightShift) -> Headroom {
    debug_assert_eq!(a.len(), b_re.len());
    debug_assert_eq!(b_re.len(), b_im.len());
    let sat = a_shr.max(0) as u32;
    for ((x, &re), &im) in a.iter_mut().zip(b_re).zip(b_im) {
        let acc = vlmacc16(vlmacc16(0, re, re), im, im);
        *x = vlsat16(acc, sat);
    }
    headroom(a)
}

#[inline(always)]
fn reflect(x: i16) -> i16 {
    vlmul16(vsign16(x), x)
}

/// Magnitude by successive rotation onto the real axis.
pub fn mag(a: &mut [i16], b_re: &[i16], b_im: &[i16], b_shr: RightShift) -> Headroom {
    debug_assert_eq!(a.len(), b_re.len());
    debug_assert_eq!(b_re.len(), b_im.len());
    for ((x, &re), &im) in a.iter_mut().zip(b_re).zip(b_im) {
        let mut b_re = reflect(vlashr16(re, b_shr));
        let mut b_im = reflect(vlashr16(im, b_shr));

        for &(rot_re, rot_im) in ROT_TABLE16.iter() {
            let neg_im = vlmul16(-ONE_Q14, b_im);
            let new_re = vlsat16(vlmacc16(vlmacc16(0, rot_im, neg_im), rot_re, b_re), 15);
            let new_im = vlsat16(vlmacc16(vlmacc16(0, rot_im, b_re), rot_re, b_im), 15);
            b_re = reflect(new_re);
            b_im = reflect(new_im);
        }
        *x = b_re;
    }
    headroom(a)
}

/// Exact sums of both parts.
pub fn sum(b_re: &[i16], b_im: &[i16]) -> Complex<i32> {
    Complex::new(super::s16::sum(b_re), super::s16::sum(b_im))
}

fn macc_impl(
    acc_re: &mut [i16],
    acc_im: &mut [i16],
    b: (&[i16], &[i16]),
    c: (&[i16], &[i16]),
    acc_shr: RightShift,
    bc_shr: RightShift,
    negate: bool,
) -> Headroom {
    let len = acc_re.len();
    debug_assert_eq!(acc_im.len(), len);
    debug_assert!(b.0.len() == len && b.1.len() == len);
    debug_assert!(c.0.len() == len && c.1.len() == len);
    for k in 0..len {
        let p = product(
            Complex::new(b.0[k] as i64, b.1[k] as i64),
            Complex::new(c.0[k] as i64, c.1[k] as i64),
            false,
        );
        let p_re = sat16(round_shr(p.re, bc_shr));
        let p_im = sat16(round_shr(p.im, bc_shr));
        let x_re = vlashr16(acc_re[k], acc_shr);
        let x_im = vlashr16(acc_im[k], acc_shr);
        if negate {
            acc_re[k] = vlsub16(x_re, p_re);
            acc_im[k] = vlsub16(x_im, p_im);
        } else {
            acc_re[k] = vladd16(x_re, p_re);
            acc_im[k] = vladd16(x_im, p_im);
        }
    }
    complex_headroom(acc_re, acc_im)
}

/// `acc = (acc >> acc_shr) + (b * c >> bc_shr)`.
pub fn macc(
    acc_re: &mut [i16],
    acc_im: &mut [i16],
    b: (&[i16], &[i16]),
    c: (&[i16], &[i16]),
    acc_shr: RightShift,
    bc_shr: RightShift,
) -> Headroom {
    macc_impl(acc_re, acc_im, b, c, acc_shr, bc_shr, false)
}

/// `acc = (acc >> acc_shr) - (b * c >> bc_shr)`.
pub fn nmacc(
    acc_re: &mut [i16],
    acc_im: &mut [i16],
    b: (&[i16], &[i16]),
    c: (&[i16], &[i16]),
    acc_shr: RightShift,
    bc_shr: RightShift,
) -> Headroom {
    macc_impl(acc_re, acc_im, b, c, acc_shr, bc_shr, true)
}

/// Negates the imaginary part.
pub fn conjugate(a_im: &mut [i16]) -> Headroom {
    for x in a_im.iter_mut() {
        *x = sat16(-(*x as i64));
    }
    headroom(a_im)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_and_conj_mul() {
        let mut re = [0x1000i16];
        let mut im = [0x2000i16];
        mul(&mut re, &mut im, &[0x1000], &[-0x1000], 12);
        // (1 + 2j)(1 - 1j) = 3 + 1j, in units of 0x1000
        assert_eq!((re[0], im[0]), (0x3000, 0x1000));

        let mut re = [0x1000i16];
        let mut im = [0x2000i16];
        conj_mul(&mut re, &mut im, &[0x1000], &[-0x1000], 12);
        // (1 + 2j)(1 + 1j) = -1 + 3j
        assert_eq!((re[0], im[0]), (-0x1000, 0x3000));
    }

    #[test]
    fn test_squared_mag_and_mag() {
        let mut sq = [0i16];
        squared_mag(&mut sq, &[0x0300], &[-0x0400], 8);
        assert_eq!(sq[0], 0x0900 + 0x1000);

        let mut m = [0i16];
        mag(&mut m, &[0x0300], &[-0x0400], -4);
        assert!((m[0] as i32 - 0x5000).abs() <= 8, "mag = {:#x}", m[0]);
    }

    #[test]
    fn test_macc_adds_product() {
        let mut acc_re = [0x0100i16];
        let mut acc_im = [0i16];
        macc(
            &mut acc_re,
            &mut acc_im,
            (&[0x0100], &[0x0100]),
            (&[0x0100], &[0]),
            0,
            8,
        );
        assert_eq!((acc_re[0], acc_im[0]), (0x0200, 0x0100));

        nmacc(
            &mut acc_re,
            &mut acc_im,
            (&[0x0100], &[0x0100]),
            (&[0x0100], &[0]),
            0,
            8,
        );
        assert_eq!((acc_re[0], acc_im[0]), (0x0100, 0));
    }

    #[test]
    fn test_conjugate_and_sum() {
        let mut im = [i16::MIN, 5];
        conjugate(&mut im);
        assert_eq!(im, [0x7FFF, -5]);
        assert_eq!(sum(&[1, 2], &[3, 4]), Complex::new(3, 7));
    }
}
