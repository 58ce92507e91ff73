//! FFTs of BFP vectors.
//!
//! These wrappers check lengths up front, bring the input to the headroom the transforms need,
//! and hand back vectors whose exponent and headroom describe the result.
//!
//! Spectra of real signals hold bins `0..N/2`, with the real Nyquist bin packed into the imaginary
//! part of bin 0. [`unpack_mono`] moves it into its own element and [`pack_mono`] moves it back.

use num::Complex;
use rayon::prelude::*;
use tracing::{debug, trace};

use super::{bit_reversal, dit_forward, dit_inverse, mono_adjust, spectra_merge, spectra_split};
use crate::bfp::{BfpComplexS32, BfpS32};
use crate::error::{
    ensure_fft_length, ensure_mono_fft_length, ensure_same_len, ensure_scratch, BfpError, Result,
};
use crate::vect::{self, complex_s32 as kernel};
use crate::vpu::{Exponent, Headroom, RightShift};

/// Headroom the transforms need on entry.
const FFT_HEADROOM: Headroom = 2;
/// Merging two half spectra can cost a bit, so their inputs get one more.
const MERGE_HEADROOM: Headroom = FFT_HEADROOM + 1;

type Transform = fn(&mut [Complex<i32>], &mut Headroom, &mut Exponent);

#[inline]
fn shr_to(hr: Headroom, target: Headroom) -> RightShift {
    target as RightShift - hr as RightShift
}

fn transform_complex(x: &mut BfpComplexS32, transform: Transform) {
    if x.hr < FFT_HEADROOM {
        let shr = shr_to(x.hr, FFT_HEADROOM);
        x.hr = kernel::shr(&mut x.data, shr);
        x.exp += shr;
    }
    bit_reversal(&mut x.data);
    transform(&mut x.data, &mut x.hr, &mut x.exp);
}

/// Forward FFT of a complex vector, in place.
pub fn forward_complex(x: &mut BfpComplexS32) -> Result<()> {
    ensure_fft_length(x.len())?;
    debug!(n = x.len(), exp = x.exp, hr = x.hr, "forward complex fft");
    transform_complex(x, dit_forward);
    Ok(())
}

/// Inverse FFT of a complex spectrum, in place.
pub fn inverse_complex(x: &mut BfpComplexS32) -> Result<()> {
    ensure_fft_length(x.len())?;
    debug!(n = x.len(), exp = x.exp, hr = x.hr, "inverse complex fft");
    transform_complex(x, dit_inverse);
    Ok(())
}

/// Forward FFTs of independent complex vectors, spread over the rayon pool.
///
/// Every length is checked before any vector is transformed.
pub fn par_forward_complex_batch(batch: &mut [BfpComplexS32]) -> Result<()> {
    for x in batch.iter() {
        ensure_fft_length(x.len())?;
    }
    debug!(count = batch.len(), "batch forward complex fft");
    batch
        .par_iter_mut()
        .for_each(|x| transform_complex(x, dit_forward));
    Ok(())
}

/// Forward FFT of a real signal of length `N`, returning bins `0..N/2` (Nyquist packed).
pub fn forward_mono(x: BfpS32) -> Result<BfpComplexS32> {
    let n = x.len();
    ensure_mono_fft_length(n)?;
    debug!(n, exp = x.exp, hr = x.hr, "forward mono fft");

    let shr = shr_to(x.hr, FFT_HEADROOM);
    let mut samples = x.data;
    vect::shr(&mut samples, shr);

    let mut data: Vec<Complex<i32>> = samples
        .chunks_exact(2)
        .map(|pair| Complex::new(pair[0], pair[1]))
        .collect();
    let mut hr = kernel::complex_headroom(&data);
    let mut exp = x.exp + shr;

    bit_reversal(&mut data);
    dit_forward(&mut data, &mut hr, &mut exp);
    mono_adjust(&mut data, false);

    Ok(BfpComplexS32::new(data, exp))
}

/// Inverse of [`forward_mono`]: takes the packed half spectrum and returns `N` real samples.
pub fn inverse_mono(x: BfpComplexS32) -> Result<BfpS32> {
    let n = 2 * x.len();
    ensure_mono_fft_length(n)?;
    debug!(n, exp = x.exp, hr = x.hr, "inverse mono fft");

    let shr = shr_to(x.hr, FFT_HEADROOM);
    let mut data = x.data;
    kernel::shr(&mut data, shr);
    let mut exp = x.exp + shr;

    mono_adjust(&mut data, true);
    let mut hr = kernel::complex_headroom(&data);
    bit_reversal(&mut data);
    dit_inverse(&mut data, &mut hr, &mut exp);

    let samples: Vec<i32> = data.iter().flat_map(|c| [c.re, c.im]).collect();
    Ok(BfpS32 {
        data: samples,
        exp,
        hr,
    })
}

/// Forward FFTs of two real signals of length `N` at once, using `scratch[..N]` as the complex
/// work buffer. Returns the two packed half spectra.
pub fn forward_stereo(
    a: &BfpS32,
    b: &BfpS32,
    scratch: &mut [Complex<i32>],
) -> Result<(BfpComplexS32, BfpComplexS32)> {
    let n = a.len();
    ensure_same_len(n, b.len())?;
    ensure_fft_length(n)?;
    ensure_scratch(n, scratch.len())?;
    debug!(n, a_exp = a.exp, b_exp = b.exp, "forward stereo fft");

    let buf = &mut scratch[..n];
    let a_shr = shr_to(a.hr, FFT_HEADROOM);
    let b_shr = shr_to(b.hr, FFT_HEADROOM);

    let mut hr = kernel::zip(buf, &a.data, &b.data, a_shr, b_shr);
    let mut exp_diff = 0;
    bit_reversal(buf);
    dit_forward(buf, &mut hr, &mut exp_diff);

    let hr = spectra_split(buf);
    trace!(hr, exp_diff, "stereo spectra split");

    let (lo, hi) = buf.split_at(n / 2);
    Ok((
        BfpComplexS32::new(lo.to_vec(), a.exp + a_shr + exp_diff),
        BfpComplexS32::new(hi.to_vec(), b.exp + b_shr + exp_diff),
    ))
}

/// Inverse of [`forward_stereo`]. `scratch` must hold `2 * a.len()` elements.
pub fn inverse_stereo(
    a: &BfpComplexS32,
    b: &BfpComplexS32,
    scratch: &mut [Complex<i32>],
) -> Result<(BfpS32, BfpS32)> {
    let half = a.len();
    ensure_same_len(half, b.len())?;
    let n = 2 * half;
    ensure_fft_length(n)?;
    ensure_scratch(n, scratch.len())?;
    debug!(n, a_exp = a.exp, b_exp = b.exp, "inverse stereo fft");

    let buf = &mut scratch[..n];
    let a_shr = shr_to(a.hr, MERGE_HEADROOM);
    let b_shr = shr_to(b.hr, MERGE_HEADROOM);
    {
        let (lo, hi) = buf.split_at_mut(half);
        lo.copy_from_slice(&a.data);
        kernel::shr(lo, a_shr);
        hi.copy_from_slice(&b.data);
        kernel::shr(hi, b_shr);
    }

    let mut hr = spectra_merge(buf);
    let mut exp_diff = 0;
    bit_reversal(buf);
    dit_inverse(buf, &mut hr, &mut exp_diff);
    trace!(hr, exp_diff, "stereo inverse done");

    let mut re = vec![0i32; n];
    let mut im = vec![0i32; n];
    kernel::unzip(&mut re, &mut im, buf);
    Ok((
        BfpS32::new(re, a.exp + a_shr + exp_diff),
        BfpS32::new(im, b.exp + b_shr + exp_diff),
    ))
}

/// Moves the Nyquist bin out of `X[0].im` into a new last element, giving `N/2 + 1` bins.
pub fn unpack_mono(x: &mut BfpComplexS32) -> Result<()> {
    ensure_mono_fft_length(2 * x.len())?;
    let nyquist = x.data[0].im;
    x.data[0].im = 0;
    x.data.push(Complex::new(nyquist, 0));
    x.headroom();
    Ok(())
}

/// Inverse of [`unpack_mono`].
pub fn pack_mono(x: &mut BfpComplexS32) -> Result<()> {
    let bins = x.len().checked_sub(1).ok_or(BfpError::EmptyVector)?;
    ensure_mono_fft_length(2 * bins)?;
    if let Some(nyquist) = x.data.pop() {
        x.data[0].im = nyquist.re;
    }
    x.headroom();
    Ok(())
}
