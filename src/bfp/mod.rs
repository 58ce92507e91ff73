//! Block floating-point vectors.
//!
//! A [`Bfp<T>`] owns its mantissas and keeps `exp` and `hr` consistent with them: every method
//! runs the matching prepare step, applies the kernel and stores the exact headroom the kernel
//! reports. Binary operations update `self` in place (`self = self op other`).
//!
//! Arguments are validated once, up front. Saturation is never reported as an error.

mod complex_s16;
mod complex_s32;
mod s16;
mod s32;

pub use complex_s16::BfpComplexS16;
pub use complex_s32::BfpComplexS32;

use tracing::trace;

use crate::error::{ensure_non_empty, ensure_same_len, Result};
use crate::prepare::{self, Saturation};
use crate::scalar::{exponent_for, ldexp, FloatS32};
use crate::traits::Mantissa;
use crate::vect;
use crate::vpu::{Exponent, Headroom, LeftShift};

/// A vector of mantissas sharing one exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bfp<T: Mantissa> {
    pub data: Vec<T>,
    pub exp: Exponent,
    pub hr: Headroom,
}

pub type BfpS16 = Bfp<i16>;
pub type BfpS32 = Bfp<i32>;

impl<T: Mantissa> Bfp<T> {
    /// Wraps `data` at exponent `exp`, computing its headroom.
    pub fn new(data: Vec<T>, exp: Exponent) -> Self {
        let hr = vect::headroom(&data);
        Self { data, exp, hr }
    }

    /// Quantises `values`, choosing the exponent that leaves one bit of headroom in the
    /// largest-magnitude element.
    pub fn from_f64(values: &[f64]) -> Self {
        let max_abs = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let exp = exponent_for(max_abs, T::BITS);
        let data = values
            .iter()
            .map(|&v| T::saturate(ldexp(v, -exp).round() as i64))
            .collect();
        Self::new(data, exp)
    }

    pub fn to_f64(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|&x| ldexp(x.widen() as f64, self.exp))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Recomputes, stores and returns the headroom. Needed after writing to `data` directly.
    pub fn headroom(&mut self) -> Headroom {
        self.hr = vect::headroom(&self.data);
        self.hr
    }

    /// Re-expresses the vector at exponent `exp`, saturating if that exponent is too small.
    pub fn use_exponent(&mut self, exp: Exponent) {
        let shr = exp - self.exp;
        if shr == 0 {
            return;
        }
        self.hr = vect::shr(&mut self.data, shr);
        self.exp = exp;
    }

    /// Multiplies the value by `2^shl` by shifting mantissas. The exponent is unchanged.
    pub fn shl(&mut self, shl: LeftShift) {
        self.hr = vect::shl(&mut self.data, shl);
    }

    pub fn add(&mut self, c: &Self, saturation: Saturation) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::add_sub(self.exp, c.exp, self.hr, c.hr, saturation);
        trace!(a_exp = p.a_exp, b_shr = p.b_shr, c_shr = p.c_shr, "bfp add");
        self.hr = vect::add(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn sub(&mut self, c: &Self, saturation: Saturation) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::add_sub(self.exp, c.exp, self.hr, c.hr, saturation);
        trace!(a_exp = p.a_exp, b_shr = p.b_shr, c_shr = p.c_shr, "bfp sub");
        self.hr = vect::sub(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// Adds the scalar `c * 2^c_exp` to every element.
    pub fn add_scalar(&mut self, c: T, c_exp: Exponent, saturation: Saturation) {
        let p = prepare::add_sub(self.exp, c_exp, self.hr, c.headroom(), saturation);
        let c = c.vlashr(p.c_shr);
        self.hr = vect::add_scalar(&mut self.data, c, p.b_shr);
        self.exp = p.a_exp;
    }

    pub fn abs(&mut self) {
        self.hr = vect::abs(&mut self.data);
    }

    pub fn rect(&mut self) {
        self.hr = vect::rect(&mut self.data);
    }

    pub fn max(&self) -> Result<FloatS32> {
        ensure_non_empty(self.len())?;
        Ok(FloatS32::new(vect::max(&self.data).widen() as i32, self.exp))
    }

    pub fn min(&self) -> Result<FloatS32> {
        ensure_non_empty(self.len())?;
        Ok(FloatS32::new(vect::min(&self.data).widen() as i32, self.exp))
    }

    /// Index of the first maximum element.
    pub fn argmax(&self) -> Result<usize> {
        ensure_non_empty(self.len())?;
        Ok(vect::argmax(&self.data))
    }

    /// Index of the first minimum element.
    pub fn argmin(&self) -> Result<usize> {
        ensure_non_empty(self.len())?;
        Ok(vect::argmin(&self.data))
    }

    pub fn max_elementwise(&mut self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::two_vec(self.exp, c.exp, self.hr, c.hr, 1);
        self.hr = vect::max_elementwise(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn min_elementwise(&mut self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::two_vec(self.exp, c.exp, self.hr, c.hr, 1);
        self.hr = vect::min_elementwise(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// Clips to bounds already converted to this vector's exponent. When the conversion pushed a
    /// bound past the opposite end of the representable range, every element collapses onto that
    /// bound, which is stored at its own exponent.
    fn apply_clip(
        &mut self,
        params: prepare::ClipParams<T>,
        lower: T,
        upper: T,
        bound_exp: Exponent,
    ) {
        let fill = if params.upper == T::VPU_MIN {
            Some(upper)
        } else if params.lower == T::VPU_MAX {
            Some(lower)
        } else {
            None
        };

        if let Some(value) = fill {
            trace!(?value, bound_exp, "clip bounds exclude every element");
            self.hr = vect::set(&mut self.data, value);
        } else {
            self.hr = vect::clip(&mut self.data, params.lower, params.upper, params.b_shr);
        }
        self.exp = params.a_exp;
    }
}
