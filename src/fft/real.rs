//! Spectrum rearrangements for real-signal FFTs.
//!
//! Two real signals `a` and `b` of length `N` are transformed together as `a + jb`, and
//! [`spectra_split`] separates the result into the half spectra `A[0..N/2]` and `B[0..N/2]`.
//! A single real signal of length `N` is transformed as an `N/2` point complex signal made of its
//! even and odd samples, and [`mono_adjust`] turns that into `X[0..N/2]`.
//!
//! In both layouts the purely real DC and Nyquist bins of a spectrum share one element: bin 0
//! holds `(DC, Nyquist)`.

use num::Complex;

use super::twiddle;
use crate::vect::complex_s32::{complex_headroom, conj_mul_q30, mul_q30, tail_reverse};
use crate::vpu::{ashr32, sat32, vladd32, vlashr32, vlsub32, Headroom, ONE_Q30};

#[inline(always)]
fn half(x: Complex<i32>) -> Complex<i64> {
    Complex::new((x.re >> 1) as i64, (x.im >> 1) as i64)
}

#[inline(always)]
fn saturate(x: Complex<i64>) -> Complex<i32> {
    Complex::new(sat32(x.re), sat32(x.im))
}

/// Splits the spectrum of `a + jb` in place: on return `x[..N/2]` is `A` and `x[N/2..]` is `B`,
/// each with DC and Nyquist packed into element 0. Returns the headroom of `x`.
pub fn spectra_split(x: &mut [Complex<i32>]) -> Headroom {
    let n = x.len();
    debug_assert!(n.is_power_of_two() && n >= 4);
    let k = n / 2;

    tail_reverse(&mut x[k..]);

    let x0 = Complex::new(x[0].re as i64, x[0].im as i64);
    let xn = Complex::new(x[k].re as i64, x[k].im as i64);
    x[0] = saturate(Complex::new(x0.re - xn.im, x0.im + xn.re));
    x[k] = saturate(Complex::new(x0.re + xn.im, x0.im - xn.re));

    let (lo, hi) = x.split_at_mut(k);
    for (p, q) in lo.iter_mut().zip(hi.iter_mut()) {
        let xp = half(*p);
        let xn = half(*q);
        *p = saturate(Complex::new(xp.re + xn.re, xp.im - xn.im));
        *q = saturate(Complex::new(xp.im + xn.im, xn.re - xp.re));
    }

    complex_headroom(x)
}

/// Inverse of [`spectra_split`]: packs the half spectra `A = x[..N/2]` and `B = x[N/2..]` into
/// the full spectrum of `a + jb`. Returns the headroom of `x`.
pub fn spectra_merge(x: &mut [Complex<i32>]) -> Headroom {
    let n = x.len();
    debug_assert!(n.is_power_of_two() && n >= 4);
    let k = n / 2;

    let dc = half(x[0]);
    let ny = half(x[k]);
    x[0] = saturate(Complex::new(dc.re + dc.im, ny.re - ny.im));
    x[k] = saturate(Complex::new(ny.re + ny.im, dc.im - dc.re));

    let (lo, hi) = x.split_at_mut(k);
    for (p, q) in lo.iter_mut().zip(hi.iter_mut()) {
        let a = Complex::new(p.re as i64, p.im as i64);
        let b = Complex::new(q.re as i64, q.im as i64);
        *p = saturate(Complex::new(a.re - b.im, a.im + b.re));
        *q = saturate(Complex::new(a.re + b.im, b.re - a.im));
    }

    tail_reverse(&mut x[k..]);
    complex_headroom(x)
}

/// Converts between the `N/2` point spectrum `Z` of the packed even/odd samples of a real signal
/// and the first half of that signal's `N` point spectrum `X`, where `N = 2 * x.len()`.
///
/// Forward: `X[k] = A_k Z[k] + B_k conj(Z[N/2 - k])` with `A_k = (1 - jW^k)/2`,
/// `B_k = (1 + jW^k)/2` and `W = exp(-2πj/N)`. The Nyquist bin is packed into `X[0].im`.
/// With `inverse` the exact inverse mapping is applied, unpacking `X[0]` first.
pub fn mono_adjust(x: &mut [Complex<i32>], inverse: bool) {
    let half_n = x.len();
    debug_assert!(half_n.is_power_of_two() && half_n >= 4);
    debug_assert!(half_n <= crate::MAX_FFT_LENGTH / 2);
    let quarter = half_n / 2;

    let mut x0 = x[0];
    let xq = x[quarter];

    tail_reverse(&mut x[quarter..]);

    let (first, second) = x.split_at_mut(quarter);
    let (lo, hi) = if inverse {
        (second, first)
    } else {
        (first, second)
    };

    let half_one = ONE_Q30 >> 1;
    for (k, (l, h)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
        let w = twiddle(half_n, k);
        // j * W
        let jw = Complex::new(sat32(-(w.im as i64)), w.re);
        let a = Complex::new(
            vlsub32(half_one, vlashr32(jw.re, 1)),
            vlsub32(0, vlashr32(jw.im, 1)),
        );
        let b = Complex::new(
            vladd32(half_one, vlashr32(jw.re, 1)),
            vladd32(0, vlashr32(jw.im, 1)),
        );

        let (x_lo, x_hi) = (*l, *h);

        let t0 = mul_q30(a, x_lo);
        let t1 = conj_mul_q30(b, x_hi);
        *l = Complex::new(vladd32(t0.re, t1.re), vladd32(t0.im, t1.im));

        let t0 = conj_mul_q30(x_hi, a);
        let t1 = conj_mul_q30(b.conj(), x_lo);
        *h = Complex::new(vladd32(t0.re, t1.re), vladd32(t0.im, t1.im));
    }

    if inverse {
        x0 = Complex::new(ashr32(x0.re as i64, 1), ashr32(x0.im as i64, 1));
    }
    x[0] = Complex::new(vladd32(x0.re, x0.im), vlsub32(x0.re, x0.im));
    x[quarter] = Complex::new(xq.re, sat32(-(xq.im as i64)));

    tail_reverse(&mut x[quarter..]);
}
