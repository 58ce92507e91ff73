use num::Complex;

use super::{BfpComplexS32, BfpS16};
use crate::error::{ensure_same_len, Result};
use crate::prepare::{self, Saturation};
use crate::scalar::{exponent_for, ldexp, FloatComplexS32};
use crate::vect::{self, complex_s16 as kernel};
use crate::vpu::{hr_s16, sat16, Exponent, Headroom, LeftShift};

/// Complex 16-bit BFP vector with real and imaginary parts in separate buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfpComplexS16 {
    pub re: Vec<i16>,
    pub im: Vec<i16>,
    pub exp: Exponent,
    pub hr: Headroom,
}

impl BfpComplexS16 {
    pub fn new(re: Vec<i16>, im: Vec<i16>, exp: Exponent) -> Result<Self> {
        ensure_same_len(re.len(), im.len())?;
        let hr = kernel::complex_headroom(&re, &im);
        Ok(Self { re, im, exp, hr })
    }

    pub fn from_f64(values: &[Complex<f64>]) -> Self {
        let max_abs = values
            .iter()
            .fold(0.0f64, |m, v| m.max(v.re.abs()).max(v.im.abs()));
        let exp = exponent_for(max_abs, 16);
        let quantise = |v: f64| sat16(ldexp(v, -exp).round() as i64);
        let re: Vec<i16> = values.iter().map(|v| quantise(v.re)).collect();
        let im: Vec<i16> = values.iter().map(|v| quantise(v.im)).collect();
        let hr = kernel::complex_headroom(&re, &im);
        Self { re, im, exp, hr }
    }

    pub fn to_f64(&self) -> Vec<Complex<f64>> {
        self.re
            .iter()
            .zip(&self.im)
            .map(|(&re, &im)| {
                Complex::new(ldexp(re as f64, self.exp), ldexp(im as f64, self.exp))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    pub fn headroom(&mut self) -> Headroom {
        self.hr = kernel::complex_headroom(&self.re, &self.im);
        self.hr
    }

    /// Multiplies the value by `2^shl`. The exponent is unchanged.
    pub fn shl(&mut self, shl: LeftShift) {
        self.hr = kernel::shl(&mut self.re, &mut self.im, shl);
    }

    pub fn add(&mut self, c: &Self, saturation: Saturation) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::add_sub(self.exp, c.exp, self.hr, c.hr, saturation);
        self.hr = kernel::add(&mut self.re, &mut self.im, &c.re, &c.im, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn sub(&mut self, c: &Self, saturation: Saturation) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::add_sub(self.exp, c.exp, self.hr, c.hr, saturation);
        self.hr = kernel::sub(&mut self.re, &mut self.im, &c.re, &c.im, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// Element-wise product with a real vector.
    pub fn real_mul(&mut self, c: &BfpS16) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s16_real_mul(self.exp, c.exp, self.hr, c.hr);
        self.hr = kernel::real_mul(&mut self.re, &mut self.im, &c.data, p.a_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn mul(&mut self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s16_mul(self.exp, c.exp, self.hr, c.hr);
        self.hr = kernel::mul(&mut self.re, &mut self.im, &c.re, &c.im, p.a_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// `self = self * conj(c)`.
    pub fn conj_mul(&mut self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s16_mul(self.exp, c.exp, self.hr, c.hr);
        self.hr = kernel::conj_mul(&mut self.re, &mut self.im, &c.re, &c.im, p.a_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn real_scale(&mut self, alpha: i16, alpha_exp: Exponent, saturation: Saturation) {
        let p = prepare::s16_scale(self.exp, alpha_exp, self.hr, hr_s16(alpha), saturation);
        self.hr = kernel::real_scale(&mut self.re, &mut self.im, alpha, p.a_shr);
        self.exp = p.a_exp;
    }

    pub fn scale(&mut self, alpha: Complex<i16>, alpha_exp: Exponent) {
        let alpha_hr = hr_s16(alpha.re).min(hr_s16(alpha.im));
        let p = prepare::complex_s16_mul(self.exp, alpha_exp, self.hr, alpha_hr);
        self.hr = kernel::scale(&mut self.re, &mut self.im, alpha, p.a_shr);
        self.exp = p.a_exp;
    }

    pub fn squared_mag(&self) -> BfpS16 {
        let p = prepare::complex_s16_squared_mag(self.exp, self.hr);
        let mut data = vec![0i16; self.len()];
        let hr = kernel::squared_mag(&mut data, &self.re, &self.im, p.a_shr);
        BfpS16 {
            data,
            exp: p.a_exp,
            hr,
        }
    }

    pub fn mag(&self) -> BfpS16 {
        let p = prepare::complex_mag(self.exp, self.hr);
        let mut data = vec![0i16; self.len()];
        let hr = kernel::mag(&mut data, &self.re, &self.im, p.b_shr);
        BfpS16 {
            data,
            exp: p.a_exp,
            hr,
        }
    }

    /// Exact sum of both parts.
    pub fn sum(&self) -> FloatComplexS32 {
        let s = kernel::sum(&self.re, &self.im);
        FloatComplexS32 {
            re: s.re,
            im: s.im,
            exp: self.exp,
        }
    }

    pub fn conjugate(&mut self) {
        let im_hr = kernel::conjugate(&mut self.im);
        self.hr = vect::headroom(&self.re).min(im_hr);
    }

    /// `self += b * c`.
    pub fn macc(&mut self, b: &Self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), b.len())?;
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s16_macc(self.exp, b.exp, c.exp, self.hr, b.hr, c.hr);
        self.hr = kernel::macc(
            &mut self.re,
            &mut self.im,
            (&b.re, &b.im),
            (&c.re, &c.im),
            p.acc_shr,
            p.bc_shr,
        );
        self.exp = p.a_exp;
        Ok(())
    }

    /// `self -= b * c`.
    pub fn nmacc(&mut self, b: &Self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), b.len())?;
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s16_macc(self.exp, b.exp, c.exp, self.hr, b.hr, c.hr);
        self.hr = kernel::nmacc(
            &mut self.re,
            &mut self.im,
            (&b.re, &b.im),
            (&c.re, &c.im),
            p.acc_shr,
            p.bc_shr,
        );
        self.exp = p.a_exp;
        Ok(())
    }

    /// Widens to an interleaved 32-bit vector. Exact.
    pub fn to_s32(&self) -> BfpComplexS32 {
        let p = prepare::s16_to_s32(self.exp);
        let mut data = vec![Complex::new(0, 0); self.len()];
        let hr = vect::complex_s32::from_s16(&mut data, &self.re, &self.im);
        BfpComplexS32 {
            data,
            exp: p.a_exp,
            hr,
        }
    }
}
