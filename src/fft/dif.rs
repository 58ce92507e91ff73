//! Decimation-in-frequency transforms. Input in natural order, output in bit-reversed order.

use num::Complex;

use super::{shift_mode, sum_diff, twiddle};
use crate::vect::complex_s32::{complex_headroom, conj_mul_q30, mul_q30};
use crate::vpu::{ashr32, Exponent, Headroom, RightShift};

/// Final radix-4 pass, leaving its four outputs in bit-reversed order.
#[inline(always)]
fn radix4(v: &mut [Complex<i32>], shr: RightShift, inverse: bool) {
    let [x0, x1, x2, x3] = [v[0], v[1], v[2], v[3]].map(|c| Complex::new(c.re as i64, c.im as i64));
    let s0 = x0 + x2;
    let s1 = x1 + x3;
    let s2 = x0 - x2;
    let s3 = if inverse {
        Complex::new(x3.im - x1.im, x1.re - x3.re)
    } else {
        Complex::new(x1.im - x3.im, x3.re - x1.re)
    };
    let out = [s0 + s1, s0 - s1, s2 + s3, s2 - s3];
    for (dst, s) in v.iter_mut().zip(out) {
        *dst = Complex::new(ashr32(s.re, shr), ashr32(s.im, shr));
    }
}

fn transform(x: &mut [Complex<i32>], hr: &mut Headroom, exp: &mut Exponent, inverse: bool) {
    let n = x.len();
    debug_assert!(n.is_power_of_two() && n >= crate::MIN_FFT_LENGTH);
    debug_assert!(n <= crate::MAX_FFT_LENGTH);

    let mut shr = shift_mode(*hr);
    let mut exp_modifier = shr;
    if inverse {
        exp_modifier -= n.trailing_zeros() as Exponent;
    }

    let mut span = n / 2;
    while span >= 4 {
        for group in x.chunks_exact_mut(2 * span) {
            let (lo, hi) = group.split_at_mut(span);
            for (p, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                let w = twiddle(span, p);
                let (sum, diff) = sum_diff(*a, *b, shr);
                *a = sum;
                *b = if inverse {
                    conj_mul_q30(diff, w)
                } else {
                    mul_q30(diff, w)
                };
            }
        }
        shr = shift_mode(complex_headroom(x));
        exp_modifier += shr;
        span >>= 1;
    }

    for v in x.chunks_exact_mut(4) {
        radix4(v, shr, inverse);
    }

    *hr = complex_headroom(x);
    *exp += exp_modifier;
}

/// Forward DFT of a natural-order buffer, producing the spectrum in bit-reversed order.
///
/// Same headroom and exponent contract as [`super::dit_forward`].
pub fn dif_forward(x: &mut [Complex<i32>], hr: &mut Headroom, exp: &mut Exponent) {
    transform(x, hr, exp, false);
}

/// Inverse DFT (with `1/N`) of a natural-order spectrum, producing bit-reversed output.
pub fn dif_inverse(x: &mut [Complex<i32>], hr: &mut Headroom, exp: &mut Exponent) {
    transform(x, hr, exp, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::{bit_reversal, dit_forward};

    fn ramp(n: usize) -> Vec<Complex<i32>> {
        let n = n as i64;
        (0..n)
            .map(|i| {
                let re = (i - 3) * 0x0100_0000 / n;
                let im = (5 - 2 * i) * 0x0080_0000 / n;
                Complex::new(re as i32, im as i32)
            })
            .collect()
    }

    #[test]
    fn test_four_point_dft() {
        let mut x = vec![
            Complex::new(0x100, 0),
            Complex::new(0, 0x100),
            Complex::new(-0x100, 0),
            Complex::new(0, -0x100),
        ];
        let mut hr = complex_headroom(&x);
        let mut exp = 0;
        dif_forward(&mut x, &mut hr, &mut exp);
        bit_reversal(&mut x);

        let scale = 2f64.powi(exp);
        let bins: Vec<Complex<f64>> = x
            .iter()
            .map(|c| Complex::new(c.re as f64 * scale, c.im as f64 * scale))
            .collect();
        // e^{+j*pi*n/2} concentrates in bin 1
        assert_eq!(
            bins,
            vec![
                Complex::new(0.0, 0.0),
                Complex::new(1024.0, 0.0),
                Complex::new(0.0, 0.0),
                Complex::new(0.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_dif_agrees_with_dit() {
        for n in [8, 64, 512] {
            let data = ramp(n);

            let mut a = data.clone();
            let (mut a_hr, mut a_exp) = (complex_headroom(&a), 0);
            dif_forward(&mut a, &mut a_hr, &mut a_exp);
            bit_reversal(&mut a);

            let mut b = data;
            let (mut b_hr, mut b_exp) = (complex_headroom(&b), 0);
            bit_reversal(&mut b);
            dit_forward(&mut b, &mut b_hr, &mut b_exp);

            let peak = b.iter().map(|c| c.re.abs().max(c.im.abs())).max().unwrap_or(0) as f64
                * 2f64.powi(b_exp);
            for (u, v) in a.iter().zip(&b) {
                let du = (u.re as f64 * 2f64.powi(a_exp)) - (v.re as f64 * 2f64.powi(b_exp));
                let dv = (u.im as f64 * 2f64.powi(a_exp)) - (v.im as f64 * 2f64.powi(b_exp));
                assert!(du.abs() < peak * 1e-6 && dv.abs() < peak * 1e-6, "n={}", n);
            }
        }
    }

    #[test]
    fn test_inverse_round_trip() {
        let data = ramp(128);
        let mut x = data.clone();
        let (mut hr, mut exp) = (complex_headroom(&x), 0);
        dif_forward(&mut x, &mut hr, &mut exp);
        bit_reversal(&mut x);
        dif_inverse(&mut x, &mut hr, &mut exp);
        bit_reversal(&mut x);

        let scale = 2f64.powi(exp);
        for (got, want) in x.iter().zip(&data) {
            assert!((got.re as f64 * scale - want.re as f64).abs() < 64.0);
            assert!((got.im as f64 * scale - want.im as f64).abs() < 64.0);
        }
    }
}
