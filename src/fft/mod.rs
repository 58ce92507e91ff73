//! In-place FFTs over interleaved `Complex<i32>` buffers with per-stage block rescaling.
//!
//! The low-level transforms ([`dit_forward`], [`dif_forward`] and their inverses) take the buffer
//! together with its headroom and exponent and update both. Before every butterfly stage the
//! buffer headroom picks a shift mode: stages run with a one bit right shift when headroom is
//! below 3, a one bit left shift when it is above 3, and unshifted otherwise. The shifts are
//! accumulated into the exponent, so the caller sees `X * 2^exp` with the DFT scale.
//!
//! Lengths are powers of two between [`crate::MIN_FFT_LENGTH`] and [`crate::MAX_FFT_LENGTH`];
//! the low-level functions only `debug_assert!` this, the [`bfp`] wrappers check it.

pub mod bfp;
mod dif;
mod dit;
mod real;
pub(crate) mod tables;

pub use bfp::{
    forward_complex, forward_mono, forward_stereo, inverse_complex, inverse_mono, inverse_stereo,
    pack_mono, par_forward_complex_batch, unpack_mono,
};
pub use dif::{dif_forward, dif_inverse};
pub use dit::{dit_forward, dit_inverse};
pub use real::{mono_adjust, spectra_merge, spectra_split};

pub use crate::vect::complex_s32::tail_reverse;

use num::Complex;
use tracing::trace;

use crate::vpu::{ashr32, Headroom, RightShift};

/// Headroom a stage's input should have so that the stage cannot overflow.
const STAGE_HEADROOM: Headroom = 3;

/// Right shift applied by the next butterfly stage.
#[inline]
pub(crate) fn shift_mode(hr: Headroom) -> RightShift {
    let mode = match hr.cmp(&STAGE_HEADROOM) {
        std::cmp::Ordering::Less => 1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => -1,
    };
    trace!(hr, mode, "fft stage shift");
    mode
}

/// Twiddle `exp(-2*pi*j*p / (2*span))` in Q30, for `span >= 4`.
#[inline(always)]
pub(crate) fn twiddle(span: usize, p: usize) -> Complex<i32> {
    debug_assert!(span >= 4 && p < span);
    tables::FFT_TWIDDLES[span - 4 + p]
}

/// `ASHR(a + b)` and `ASHR(a - b)`, each computed at full width before shifting.
#[inline(always)]
pub(crate) fn sum_diff(
    a: Complex<i32>,
    b: Complex<i32>,
    shr: RightShift,
) -> (Complex<i32>, Complex<i32>) {
    let (are, aim) = (a.re as i64, a.im as i64);
    let (bre, bim) = (b.re as i64, b.im as i64);
    (
        Complex::new(ashr32(are + bre, shr), ashr32(aim + bim, shr)),
        Complex::new(ashr32(are - bre, shr), ashr32(aim - bim, shr)),
    )
}

/// Permutes `x` so that element `i` moves to the index with the low `log2(N)` bits of `i`
/// reversed. Its own inverse.
pub fn bit_reversal(x: &mut [Complex<i32>]) {
    let n = x.len();
    debug_assert!(n.is_power_of_two());
    if n < 2 {
        return;
    }
    let bits = n.trailing_zeros();
    for i in 0..n {
        let rev = i.reverse_bits() >> (usize::BITS - bits);
        if rev > i {
            x.swap(i, rev);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_reversal_permutation() {
        let mut x: Vec<Complex<i32>> = (0..8).map(|i| Complex::new(i, -i)).collect();
        bit_reversal(&mut x);
        let order: Vec<i32> = x.iter().map(|c| c.re).collect();
        assert_eq!(order, vec![0, 4, 2, 6, 1, 5, 3, 7]);

        bit_reversal(&mut x);
        let order: Vec<i32> = x.iter().map(|c| c.re).collect();
        assert_eq!(order, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_shift_mode() {
        assert_eq!(shift_mode(0), 1);
        assert_eq!(shift_mode(2), 1);
        assert_eq!(shift_mode(3), 0);
        assert_eq!(shift_mode(4), -1);
        assert_eq!(shift_mode(31), -1);
    }

    #[test]
    fn test_twiddle_layout() {
        let one = crate::vpu::ONE_Q30;
        // first entry of every stage is exp(0)
        for span in [4, 8, 16, 512] {
            assert_eq!(twiddle(span, 0), Complex::new(one, 0));
        }
        // quarter turn of stage 4 is exp(-j*pi/2)
        assert_eq!(twiddle(4, 2), Complex::new(0, -one));
        assert_eq!(twiddle(8, 4), Complex::new(0, -one));
    }

    #[test]
    fn test_sum_diff_saturates() {
        let big = Complex::new(0x7000_0000, -0x7000_0000);
        let (s, d) = sum_diff(big, big, 0);
        assert_eq!(s, Complex::new(0x7FFF_FFFF, -0x7FFF_FFFF));
        assert_eq!(d, Complex::new(0, 0));

        let (s, _) = sum_diff(big, big, 1);
        assert_eq!(s, big);
    }
}
