//! Decimation-in-time transforms. Input in bit-reversed order, output in natural order.

use num::Complex;

use super::{shift_mode, sum_diff, twiddle};
use crate::vect::complex_s32::{complex_headroom, conj_mul_q30, mul_q30};
use crate::vpu::{ashr32, Exponent, Headroom, RightShift};

/// Radix-4 pass over four bit-reversed inputs. `inverse` picks the sign of the `j` rotation.
#[inline(always)]
fn radix4(v: &mut [Complex<i32>], shr: RightShift, inverse: bool) {
    let [x0, x1, x2, x3] = [v[0], v[1], v[2], v[3]].map(|c| Complex::new(c.re as i64, c.im as i64));
    let s0 = x0 + x1;
    let s1 = x0 - x1;
    let s2 = x2 + x3;
    let s3 = if inverse {
        Complex::new(x3.im - x2.im, x2.re - x3.re)
    } else {
        Complex::new(x2.im - x3.im, x3.re - x2.re)
    };
    let out = [s0 + s2, s1 + s3, s0 - s2, s1 - s3];
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
        exp_modifier -= 2;
    }

    for v in x.chunks_exact_mut(4) {
        radix4(v, shr, inverse);
    }

    let mut span = 4;
    while span < n {
        shr = shift_mode(complex_headroom(x));
        exp_modifier += shr;
        if inverse {
            exp_modifier -= 1;
        }

        for group in x.chunks_exact_mut(2 * span) {
            let (lo, hi) = group.split_at_mut(span);
            for (p, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                let w = twiddle(span, p);
                let t = if inverse {
                    conj_mul_q30(*b, w)
                } else {
                    mul_q30(*b, w)
                };
                (*a, *b) = sum_diff(*a, t, shr);
            }
        }
        span <<= 1;
    }

    *hr = complex_headroom(x);
    *exp += exp_modifier;
}

/// Forward DFT of a bit-reversed buffer: on return `x * 2^exp` is `X[f] = sum x[n] e^{-2πjfn/N}`.
///
/// `hr` must be the headroom of `x` on entry (at least 2 bits, or the first stages may
/// saturate). It is updated to the headroom of the result.
pub fn dit_forward(x: &mut [Complex<i32>], hr: &mut Headroom, exp: &mut Exponent) {
    transform(x, hr, exp, false);
}

/// Inverse DFT of a bit-reversed buffer, including the `1/N` normalisation.
pub fn dit_inverse(x: &mut [Complex<i32>], hr: &mut Headroom, exp: &mut Exponent) {
    transform(x, hr, exp, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::bit_reversal;

    fn to_f64(x: &[Complex<i32>], exp: Exponent) -> Vec<Complex<f64>> {
        let scale = 2f64.powi(exp);
        x.iter()
            .map(|c| Complex::new(c.re as f64 * scale, c.im as f64 * scale))
            .collect()
    }

    fn dft(x: &[Complex<f64>], sign: f64) -> Vec<Complex<f64>> {
        let n = x.len();
        (0..n)
            .map(|f| {
                x.iter().enumerate().fold(Complex::new(0.0, 0.0), |acc, (t, v)| {
                    let theta = sign * 2.0 * std::f64::consts::PI * (f * t) as f64 / n as f64;
                    acc + v * Complex::new(theta.cos(), theta.sin())
                })
            })
            .collect()
    }

    fn input(n: usize) -> Vec<Complex<i32>> {
        (0..n)
            .map(|i| {
                let i = i as i32;
                Complex::new((i * 7919 % 2001 - 1000) << 17, (i * 104_729 % 1999 - 999) << 17)
            })
            .collect()
    }

    #[test]
    fn test_impulse_is_flat() {
        let mut x = vec![Complex::new(0, 0); 16];
        x[0] = Complex::new(0x1000_0000, 0);
        let mut hr = complex_headroom(&x);
        let mut exp = -28;
        bit_reversal(&mut x);
        dit_forward(&mut x, &mut hr, &mut exp);

        for v in to_f64(&x, exp) {
            assert!((v.re - 1.0).abs() < 1e-6 && v.im.abs() < 1e-6, "{:?}", v);
        }
        assert_eq!(hr, complex_headroom(&x));
    }

    #[test]
    fn test_forward_matches_dft() {
        for n in [4, 8, 32, 256] {
            let data = input(n);
            let expected = dft(&to_f64(&data, 0), -1.0);

            let mut x = data.clone();
            let mut hr = complex_headroom(&x);
            let mut exp = 0;
            bit_reversal(&mut x);
            dit_forward(&mut x, &mut hr, &mut exp);

            let peak = expected.iter().map(|v| v.norm()).fold(0.0, f64::max);
            for (got, want) in to_f64(&x, exp).iter().zip(&expected) {
                assert!((got - want).norm() < peak * 1e-6, "n={} {:?} {:?}", n, got, want);
            }
        }
    }

    #[test]
    fn test_inverse_round_trip() {
        let data = input(64);
        let mut x = data.clone();
        let mut hr = complex_headroom(&x);
        let mut exp = 0;
        bit_reversal(&mut x);
        dit_forward(&mut x, &mut hr, &mut exp);
        bit_reversal(&mut x);
        dit_inverse(&mut x, &mut hr, &mut exp);

        let peak = (1000i64 << 17) as f64;
        for (got, want) in to_f64(&x, exp).iter().zip(to_f64(&data, 0)) {
            assert!((got - want).norm() < peak * 1e-6, "{:?} {:?}", got, want);
        }
    }
}
