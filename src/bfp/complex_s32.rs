use num::Complex;

use super::{BfpComplexS16, BfpS32};
use crate::error::{ensure_same_len, Result};
use crate::prepare::{self, Saturation};
use crate::scalar::{exponent_for, ldexp, FloatComplexS64};
use crate::vect::complex_s32 as kernel;
use crate::vpu::{hr_s32, sat32, Exponent, Headroom, LeftShift};

/// Complex 32-bit BFP vector, interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfpComplexS32 {
    pub data: Vec<Complex<i32>>,
    pub exp: Exponent,
    pub hr: Headroom,
}

impl BfpComplexS32 {
    pub fn new(data: Vec<Complex<i32>>, exp: Exponent) -> Self {
        let hr = kernel::complex_headroom(&data);
        Self { data, exp, hr }
    }

    pub fn from_f64(values: &[Complex<f64>]) -> Self {
        let max_abs = values
            .iter()
            .fold(0.0f64, |m, v| m.max(v.re.abs()).max(v.im.abs()));
        let exp = exponent_for(max_abs, 32);
        let quantise = |v: f64| sat32(ldexp(v, -exp).round() as i64);
        let data = values
            .iter()
            .map(|v| Complex::new(quantise(v.re), quantise(v.im)))
            .collect();
        Self::new(data, exp)
    }

    pub fn to_f64(&self) -> Vec<Complex<f64>> {
        self.data
            .iter()
            .map(|x| Complex::new(ldexp(x.re as f64, self.exp), ldexp(x.im as f64, self.exp)))
            .collect()
    }

    /// Builds a complex vector from separate real and imaginary BFP vectors, aligned to a common
    /// exponent with one bit of headroom in the larger part.
    pub fn make(re: &BfpS32, im: &BfpS32) -> Result<Self> {
        ensure_same_len(re.len(), im.len())?;
        let p = prepare::two_vec(re.exp, im.exp, re.hr, im.hr, 1);
        let mut data = vec![Complex::new(0, 0); re.len()];
        let hr = kernel::zip(&mut data, &re.data, &im.data, p.b_shr, p.c_shr);
        Ok(Self {
            data,
            exp: p.a_exp,
            hr,
        })
    }

    pub fn real_part(&self) -> BfpS32 {
        BfpS32::new(self.data.iter().map(|x| x.re).collect(), self.exp)
    }

    pub fn imag_part(&self) -> BfpS32 {
        BfpS32::new(self.data.iter().map(|x| x.im).collect(), self.exp)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn headroom(&mut self) -> Headroom {
        self.hr = kernel::complex_headroom(&self.data);
        self.hr
    }

    /// Multiplies the value by `2^shl`. The exponent is unchanged.
    pub fn shl(&mut self, shl: LeftShift) {
        self.hr = kernel::shl(&mut self.data, shl);
    }

    pub fn add(&mut self, c: &Self, saturation: Saturation) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::add_sub(self.exp, c.exp, self.hr, c.hr, saturation);
        self.hr = kernel::add(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn sub(&mut self, c: &Self, saturation: Saturation) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::add_sub(self.exp, c.exp, self.hr, c.hr, saturation);
        self.hr = kernel::sub(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn real_mul(&mut self, c: &BfpS32) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s32_real_mul(self.exp, c.exp, self.hr, c.hr);
        self.hr = kernel::real_mul(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn mul(&mut self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s32_mul(self.exp, c.exp, self.hr, c.hr);
        self.hr = kernel::mul(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn conj_mul(&mut self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s32_mul(self.exp, c.exp, self.hr, c.hr);
        self.hr = kernel::conj_mul(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    pub fn real_scale(&mut self, alpha: i32, alpha_exp: Exponent) {
        let p = prepare::s32_mul(self.exp, alpha_exp, self.hr, hr_s32(alpha));
        self.hr = kernel::real_scale(&mut self.data, alpha, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
    }

    pub fn scale(&mut self, alpha: Complex<i32>, alpha_exp: Exponent) {
        let alpha_hr = kernel::element_headroom(alpha);
        let p = prepare::complex_s32_scale(self.exp, alpha_exp, self.hr, alpha_hr);
        self.hr = kernel::scale(&mut self.data, alpha, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
    }

    pub fn squared_mag(&self) -> BfpS32 {
        let p = prepare::complex_s32_squared_mag(self.exp, self.hr);
        let mut data = vec![0i32; self.len()];
        let hr = kernel::squared_mag(&mut data, &self.data, p.b_shr);
        BfpS32 {
            data,
            exp: p.a_exp,
            hr,
        }
    }

    pub fn mag(&self) -> BfpS32 {
        let p = prepare::complex_mag(self.exp, self.hr);
        let mut data = vec![0i32; self.len()];
        let hr = kernel::mag(&mut data, &self.data, p.b_shr);
        BfpS32 {
            data,
            exp: p.a_exp,
            hr,
        }
    }

    /// Sum in 40-bit accumulators, pre-shifted only when the length demands it.
    pub fn sum(&self) -> FloatComplexS64 {
        let p = prepare::complex_s32_sum(self.exp, self.hr, self.len());
        let s = kernel::sum(&self.data, p.b_shr);
        FloatComplexS64 {
            re: s.re,
            im: s.im,
            exp: p.a_exp,
        }
    }

    pub fn conjugate(&mut self) {
        self.hr = kernel::conjugate(&mut self.data);
    }

    /// `self += b * c`.
    pub fn macc(&mut self, b: &Self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), b.len())?;
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s32_macc(self.exp, b.exp, c.exp, self.hr, b.hr, c.hr);
        self.hr = kernel::macc(&mut self.data, &b.data, &c.data, p.acc_shr, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// `self -= b * c`.
    pub fn nmacc(&mut self, b: &Self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), b.len())?;
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::complex_s32_macc(self.exp, b.exp, c.exp, self.hr, b.hr, c.hr);
        self.hr = kernel::nmacc(&mut self.data, &b.data, &c.data, p.acc_shr, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// Narrows to split 16-bit parts.
    pub fn to_s16(&self, saturation: Saturation) -> BfpComplexS16 {
        let p = prepare::s32_to_s16(self.exp, self.hr, saturation);
        let mut re = vec![0i16; self.len()];
        let mut im = vec![0i16; self.len()];
        let hr = kernel::to_s16(&mut re, &mut im, &self.data, p.b_shr);
        BfpComplexS16 {
            re,
            im,
            exp: p.a_exp,
            hr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c64(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    fn assert_close(actual: &[Complex<f64>], expected: &[Complex<f64>], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).norm() <= tol,
                "index {}: expected {}, got {}",
                i,
                e,
                a
            );
        }
    }

    #[test]
    fn test_make_and_parts() {
        let re = BfpS32::from_f64(&[1.0, 2.0]);
        let im = BfpS32::from_f64(&[0.5, -4.0]);
        let z = BfpComplexS32::make(&re, &im).unwrap();
        assert_eq!(z.to_f64(), vec![c64(1.0, 0.5), c64(2.0, -4.0)]);
        assert_eq!(z.real_part().to_f64(), vec![1.0, 2.0]);
        assert_eq!(z.imag_part().to_f64(), vec![0.5, -4.0]);

        let short = BfpS32::from_f64(&[1.0]);
        assert!(BfpComplexS32::make(&re, &short).is_err());
    }

    #[test]
    fn test_products() {
        let b = BfpComplexS32::from_f64(&[c64(1.0, 2.0), c64(-0.5, 0.25)]);
        let c = BfpComplexS32::from_f64(&[c64(1.0, -1.0), c64(2.0, 2.0)]);

        let mut p = b.clone();
        p.mul(&c).unwrap();
        assert_close(&p.to_f64(), &[c64(3.0, 1.0), c64(-1.5, -0.5)], 1e-8);

        let mut p = b.clone();
        p.conj_mul(&c).unwrap();
        assert_close(&p.to_f64(), &[c64(-1.0, 3.0), c64(-0.5, 1.5)], 1e-8);

        let mut p = b.clone();
        p.real_mul(&BfpS32::from_f64(&[2.0, -4.0])).unwrap();
        assert_close(&p.to_f64(), &[c64(2.0, 4.0), c64(2.0, -1.0)], 1e-8);

        let mut p = b.clone();
        p.real_scale(0x3000_0000, -29);
        assert_close(&p.to_f64(), &[c64(1.5, 3.0), c64(-0.75, 0.375)], 1e-8);

        let mut p = b;
        p.scale(Complex::new(0, 0x2000_0000), -29);
        assert_close(&p.to_f64(), &[c64(-2.0, 1.0), c64(-0.25, -0.5)], 1e-8);
    }

    #[test]
    fn test_magnitudes_and_sum() {
        let b = BfpComplexS32::from_f64(&[c64(3.0, 4.0), c64(-1.0, 0.0)]);
        let sq = b.squared_mag().to_f64();
        assert!((sq[0] - 25.0).abs() < 1e-6 && (sq[1] - 1.0).abs() < 1e-6, "{:?}", sq);

        let m = b.mag().to_f64();
        assert!((m[0] - 5.0).abs() < 1e-5 && (m[1] - 1.0).abs() < 1e-5, "{:?}", m);

        assert_eq!(b.sum().to_f64(), c64(2.0, 4.0));
    }

    #[test]
    fn test_add_macc_conjugate() {
        let mut acc = BfpComplexS32::from_f64(&[c64(1.0, 1.0)]);
        let b = BfpComplexS32::from_f64(&[c64(0.0, 2.0)]);
        let c = BfpComplexS32::from_f64(&[c64(0.5, 0.0)]);

        acc.macc(&b, &c).unwrap();
        assert_close(&acc.to_f64(), &[c64(1.0, 2.0)], 1e-8);
        acc.nmacc(&b, &c).unwrap();
        assert_close(&acc.to_f64(), &[c64(1.0, 1.0)], 1e-8);

        acc.add(&b, Saturation::Avoid).unwrap();
        assert_close(&acc.to_f64(), &[c64(1.0, 3.0)], 1e-8);
        acc.sub(&c, Saturation::Allow).unwrap();
        assert_close(&acc.to_f64(), &[c64(0.5, 3.0)], 1e-8);

        acc.conjugate();
        assert_close(&acc.to_f64(), &[c64(0.5, -3.0)], 1e-8);
        assert_eq!(acc.hr, kernel::complex_headroom(&acc.data));
    }
}
