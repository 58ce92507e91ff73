//! Complex 32-bit kernels over interleaved `Complex<i32>` buffers.

use num::Complex;

use super::headroom;
use crate::fft::tables::ROT_TABLE32;
use crate::vpu::{
    ashr32, round_shr, sat16, sat32, sat40, vcmcr32, vcmi32, vcmr32, vladd32, vlashr32,
    vlmul32, vlsub32, vsign32, Headroom, LeftShift, RightShift,
};

#[inline(always)]
pub(crate) fn element_headroom(x: Complex<i32>) -> Headroom {
    crate::vpu::hr_s32(x.re).min(crate::vpu::hr_s32(x.im))
}

/// Headroom of the worst-case real or imaginary part.
pub fn complex_headroom(b: &[Complex<i32>]) -> Headroom {
    b.iter().map(|&x| element_headroom(x)).min().unwrap_or(31)
}

#[inline(always)]
fn vlashr(x: Complex<i32>, shr: RightShift) -> Complex<i32> {
    Complex::new(vlashr32(x.re, shr), vlashr32(x.im, shr))
}

#[inline(always)]
fn ashr(x: Complex<i32>, shr: RightShift) -> Complex<i32> {
    Complex::new(ashr32(x.re as i64, shr), ashr32(x.im as i64, shr))
}

#[inline(always)]
fn q30(x: i32, y: i32) -> i64 {
    round_shr(x as i64 * y as i64, 30)
}

pub fn shl(a: &mut [Complex<i32>], shl: LeftShift) -> Headroom {
    for x in a.iter_mut() {
        *x = vlashr(*x, -shl);
    }
    complex_headroom(a)
}

pub fn shr(a: &mut [Complex<i32>], shr: RightShift) -> Headroom {
    for x in a.iter_mut() {
        *x = vlashr(*x, shr);
    }
    complex_headroom(a)
}

pub fn add(
    a: &mut [Complex<i32>],
    c: &[Complex<i32>],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        let b = vlashr(*x, b_shr);
        let c = vlashr(y, c_shr);
        *x = Complex::new(vladd32(b.re, c.re), vladd32(b.im, c.im));
    }
    complex_headroom(a)
}

pub fn sub(
    a: &mut [Complex<i32>],
    c: &[Complex<i32>],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        let b = vlashr(*x, b_shr);
        let c = vlashr(y, c_shr);
        *x = Complex::new(vlsub32(b.re, c.re), vlsub32(b.im, c.im));
    }
    complex_headroom(a)
}

/// Complex vector times real vector.
pub fn real_mul(
    a: &mut [Complex<i32>],
    c: &[i32],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        let b = ashr(*x, b_shr);
        let c = ashr32(y as i64, c_shr);
        *x = Complex::new(sat32(q30(b.re, c)), sat32(q30(b.im, c)));
    }
    complex_headroom(a)
}

pub fn real_scale(
    a: &mut [Complex<i32>],
    alpha: i32,
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    let c = vlashr32(alpha, c_shr);
    for x in a.iter_mut() {
        let b = vlashr(*x, b_shr);
        *x = Complex::new(vlmul32(b.re, c), vlmul32(b.im, c));
    }
    complex_headroom(a)
}

/// Product of two complex values after shifting, each partial product rounded to Q30.
#[inline(always)]
pub(crate) fn mul_q30(b: Complex<i32>, c: Complex<i32>) -> Complex<i32> {
    let re = q30(b.re, c.re) - q30(b.im, c.im);
    let im = q30(b.re, c.im) + q30(b.im, c.re);
    Complex::new(sat32(re), sat32(im))
}

/// `b * conj(c)` with each partial product rounded to Q30.
#[inline(always)]
pub(crate) fn conj_mul_q30(b: Complex<i32>, c: Complex<i32>) -> Complex<i32> {
    let re = q30(b.re, c.re) + q30(b.im, c.im);
    let im = q30(b.im, c.re) - q30(b.re, c.im);
    Complex::new(sat32(re), sat32(im))
}

pub fn mul(
    a: &mut [Complex<i32>],
    c: &[Complex<i32>],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        *x = mul_q30(ashr(*x, b_shr), ashr(y, c_shr));
    }
    complex_headroom(a)
}

/// `a = a * conj(c)`.
pub fn conj_mul(
    a: &mut [Complex<i32>],
    c: &[Complex<i32>],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        *x = conj_mul_q30(ashr(*x, b_shr), ashr(y, c_shr));
    }
    complex_headroom(a)
}

/// `a = a * alpha` for a complex scalar.
pub fn scale(
    a: &mut [Complex<i32>],
    alpha: Complex<i32>,
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    let c = vlashr(alpha, c_shr);
    for x in a.iter_mut() {
        let b = vlashr(*x, b_shr);
        *x = Complex::new(vcmr32(b, c), vcmi32(b, c));
    }
    complex_headroom(a)
}

pub fn squared_mag(a: &mut [i32], b: &[Complex<i32>], b_shr: RightShift) -> Headroom {
    debug_assert_eq!(a.len(), b.len());
    for (x, &y) in a.iter_mut().zip(b) {
        let v = vlashr(y, b_shr);
        *x = vcmcr32(v, v);
    }
    headroom(a)
}

#[inline(always)]
fn reflect(x: Complex<i32>) -> Complex<i32> {
    Complex::new(vlmul32(vsign32(x.re), x.re), vlmul32(vsign32(x.im), x.im))
}

/// Magnitude by successive rotation onto the real axis.
pub fn mag(a: &mut [i32], b: &[Complex<i32>], b_shr: RightShift) -> Headroom {
    debug_assert_eq!(a.len(), b.len());
    for (x, &y) in a.iter_mut().zip(b) {
        let mut v = reflect(vlashr(y, b_shr));
        for &rot in ROT_TABLE32.iter() {
            v = reflect(Complex::new(vcmr32(v, rot), vcmi32(v, rot)));
        }
        *x = v.re;
    }
    headroom(a)
}

/// Sum of shifted elements in 40-bit accumulators.
pub fn sum(b: &[Complex<i32>], b_shr: RightShift) -> Complex<i64> {
    b.iter().fold(Complex::new(0i64, 0i64), |acc, &x| {
        let v = vlashr(x, b_shr);
        Complex::new(sat40(acc.re + v.re as i64), sat40(acc.im + v.im as i64))
    })
}

fn macc_impl(
    acc: &mut [Complex<i32>],
    b: &[Complex<i32>],
    c: &[Complex<i32>],
    shifts: (RightShift, RightShift, RightShift),
    negate: bool,
) -> Headroom {
    debug_assert_eq!(acc.len(), b.len());
    debug_assert_eq!(b.len(), c.len());
    let (acc_shr, b_shr, c_shr) = shifts;
    for ((x, &p), &q) in acc.iter_mut().zip(b).zip(c) {
        let product = mul_q30(ashr(p, b_shr), ashr(q, c_shr));
        let prev = vlashr(*x, acc_shr);
        *x = if negate {
            Complex::new(vlsub32(prev.re, product.re), vlsub32(prev.im, product.im))
        } else {
            Complex::new(vladd32(prev.re, product.re), vladd32(prev.im, product.im))
        };
    }
    complex_headroom(acc)
}

/// `acc = (acc >> acc_shr) + (b >> b_shr) * (c >> c_shr)`.
pub fn macc(
    acc: &mut [Complex<i32>],
    b: &[Complex<i32>],
    c: &[Complex<i32>],
    acc_shr: RightShift,
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    macc_impl(acc, b, c, (acc_shr, b_shr, c_shr), false)
}

/// `acc = (acc >> acc_shr) - (b >> b_shr) * (c >> c_shr)`.
pub fn nmacc(
    acc: &mut [Complex<i32>],
    b: &[Complex<i32>],
    c: &[Complex<i32>],
    acc_shr: RightShift,
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    macc_impl(acc, b, c, (acc_shr, b_shr, c_shr), true)
}

pub fn conjugate(a: &mut [Complex<i32>]) -> Headroom {
    for x in a.iter_mut() {
        x.im = sat32(-(x.im as i64));
    }
    complex_headroom(a)
}

/// Swaps `x[i]` and `x[N - i]` for `0 < i < N/2`, reversing all but the first element.
pub fn tail_reverse(x: &mut [Complex<i32>]) {
    let n = x.len();
    for i in 1..(n + 1) / 2 {
        x.swap(i, n - i);
    }
}

/// Interleaves two real vectors into one complex vector, shifting each part independently.
pub fn zip(
    a: &mut [Complex<i32>],
    b: &[i32],
    c: &[i32],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(b.len(), c.len());
    for ((x, &re), &im) in a.iter_mut().zip(b).zip(c) {
        *x = Complex::new(vlashr32(re, b_shr), vlashr32(im, c_shr));
    }
    complex_headroom(a)
}

/// Splits a complex vector into its real and imaginary parts.
pub fn unzip(re: &mut [i32], im: &mut [i32], b: &[Complex<i32>]) {
    debug_assert_eq!(re.len(), b.len());
    debug_assert_eq!(im.len(), b.len());
    for ((r, i), &x) in re.iter_mut().zip(im.iter_mut()).zip(b) {
        *r = x.re;
        *i = x.im;
    }
}

/// Narrows to split 16-bit parts, rounding on right shifts.
pub fn to_s16(a_re: &mut [i16], a_im: &mut [i16], b: &[Complex<i32>], b_shr: RightShift) -> Headroom {
    debug_assert_eq!(a_re.len(), b.len());
    debug_assert_eq!(a_im.len(), b.len());
    let narrow = |v: i32| {
        if b_shr > 0 {
            sat16(round_shr(v as i64, b_shr))
        } else {
            crate::vpu::ashr16(v as i64, b_shr)
        }
    };
    for ((r, i), &x) in a_re.iter_mut().zip(a_im.iter_mut()).zip(b) {
        *r = narrow(x.re);
        *i = narrow(x.im);
    }
    super::complex_s16::complex_headroom(a_re, a_im)
}

/// Widens split 16-bit parts by 8 bits. Exact.
pub fn from_s16(a: &mut [Complex<i32>], b_re: &[i16], b_im: &[i16]) -> Headroom {
    debug_assert_eq!(a.len(), b_re.len());
    debug_assert_eq!(a.len(), b_im.len());
    for ((x, &re), &im) in a.iter_mut().zip(b_re).zip(b_im) {
        *x = Complex::new((re as i32) << 8, (im as i32) << 8);
    }
    complex_headroom(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: i32 = 0x4000_0000;

    fn c(re: i32, im: i32) -> Complex<i32> {
        Complex::new(re, im)
    }

    #[test]
    fn test_headroom_takes_worse_part() {
        assert_eq!(complex_headroom(&[c(1, -0x4000)]), 17);
        assert_eq!(complex_headroom(&[]), 31);
        assert_eq!(complex_headroom(&[c(0, i32::MIN)]), 0);
    }

    #[test]
    fn test_mul_conj_mul() {
        let mut a = [c(ONE / 2, ONE / 4)];
        mul(&mut a, &[c(0, ONE)], 0, 0);
        assert_eq!(a[0], c(-ONE / 4, ONE / 2));

        let mut a = [c(ONE / 2, ONE / 4)];
        conj_mul(&mut a, &[c(0, ONE)], 0, 0);
        assert_eq!(a[0], c(ONE / 4, -ONE / 2));
    }

    #[test]
    fn test_scale_and_real_mul() {
        let mut a = [c(ONE, -ONE)];
        scale(&mut a, c(ONE / 2, ONE / 2), 1, 0);
        assert_eq!(a[0], c(ONE / 2, 0));

        let mut a = [c(ONE, -ONE)];
        real_mul(&mut a, &[ONE / 2], 0, 0);
        assert_eq!(a[0], c(ONE / 2, -ONE / 2));

        let mut a = [c(ONE, -ONE)];
        real_scale(&mut a, ONE, 2, 0);
        assert_eq!(a[0], c(ONE / 4, -ONE / 4));
    }

    #[test]
    fn test_mag_of_pythagorean_triple() {
        let mut m = [0i32];
        mag(&mut m, &[c(3 << 26, -(4 << 26))], 0);
        let expected = 5i64 << 26;
        assert!((m[0] as i64 - expected).abs() < 64, "mag = {}", m[0]);

        let mut sq = [0i32];
        squared_mag(&mut sq, &[c(ONE / 2, ONE / 2)], 0);
        assert_eq!(sq[0], ONE / 2);
    }

    #[test]
    fn test_tail_reverse() {
        let mut x: Vec<_> = (0..6).map(|i| c(i, 0)).collect();
        tail_reverse(&mut x);
        let re: Vec<i32> = x.iter().map(|v| v.re).collect();
        assert_eq!(re, vec![0, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_zip_unzip() {
        let mut z = [c(0, 0); 2];
        zip(&mut z, &[4, 8], &[1, 2], 1, -1);
        assert_eq!(z, [c(2, 2), c(4, 4)]);

        let mut re = [0; 2];
        let mut im = [0; 2];
        unzip(&mut re, &mut im, &z);
        assert_eq!(re, [2, 4]);
        assert_eq!(im, [2, 4]);
    }

    #[test]
    fn test_macc_and_sum() {
        let mut acc = [c(ONE / 2, 0)];
        macc(&mut acc, &[c(0, ONE / 2)], &[c(0, ONE / 2)], 0, 0, 0);
        assert_eq!(acc[0], c(ONE / 4, 0));
        nmacc(&mut acc, &[c(0, ONE / 2)], &[c(0, ONE / 2)], 0, 0, 0);
        assert_eq!(acc[0], c(ONE / 2, 0));

        let s = sum(&[c(1, 2), c(3, -4)], 0);
        assert_eq!(s, Complex::new(4, -2));
    }

    #[test]
    fn test_bit_depth_conversion() {
        let mut re = [0i16; 1];
        let mut im = [0i16; 1];
        to_s16(&mut re, &mut im, &[c(0x0001_8000, -0x0001_0000)], 16);
        assert_eq!((re[0], im[0]), (2, -1));

        let mut wide = [c(0, 0)];
        from_s16(&mut wide, &re, &im);
        assert_eq!(wide[0], c(0x200, -0x100));
    }
}
