use tracing::warn;

use super::{BfpS16, BfpS32};
use crate::error::{ensure_non_empty, ensure_same_len, BfpError, Result};
use crate::prepare::{self, Saturation};
use crate::scalar::{s32_inverse, s32_mul, s32_sqrt, s64_to_s32, FloatS32, FloatS64};
use crate::vect;
use crate::vpu::{hr_s16, hr_s32, hr_s64, sat32, Exponent};
use crate::{SQRT_DEPTH_S16, SQRT_DEPTH_S32, SQRT_MAX_DEPTH_S16};

impl BfpS16 {
    /// Element-wise product.
    pub fn mul(&mut self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::s16_mul(self.exp, c.exp, self.hr, c.hr);
        self.hr = vect::s16::mul(&mut self.data, &c.data, p.a_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// Multiplies every element by `alpha * 2^alpha_exp`.
    pub fn scale(&mut self, alpha: i16, alpha_exp: Exponent, saturation: Saturation) {
        let p = prepare::s16_scale(self.exp, alpha_exp, self.hr, hr_s16(alpha), saturation);
        self.hr = vect::s16::scale(&mut self.data, alpha, p.a_shr);
        self.exp = p.a_exp;
    }

    /// Clamps every element to `[lower, upper] * 2^bound_exp`.
    pub fn clip(&mut self, lower: i16, upper: i16, bound_exp: Exponent) -> Result<()> {
        if lower > upper {
            return Err(BfpError::InvalidBounds {
                lower: lower.into(),
                upper: upper.into(),
            });
        }
        let params = prepare::s16_clip(self.exp, bound_exp, lower, upper);
        self.apply_clip(params, lower, upper, bound_exp);
        Ok(())
    }

    /// Element-wise square root to [`SQRT_DEPTH_S16`] bits. Negative elements become zero.
    pub fn sqrt(&mut self) {
        self.sqrt_to_depth(SQRT_DEPTH_S16);
    }

    /// Square root computing only the `depth` most significant result bits. Depths beyond the
    /// mantissa width are clamped.
    pub fn sqrt_with_depth(&mut self, depth: u32) -> Result<()> {
        if depth == 0 {
            return Err(BfpError::InvalidDepth {
                depth,
                max: SQRT_MAX_DEPTH_S16,
            });
        }
        if depth > SQRT_MAX_DEPTH_S16 {
            warn!(depth, max = SQRT_MAX_DEPTH_S16, "sqrt depth clamped");
        }
        self.sqrt_to_depth(depth.min(SQRT_MAX_DEPTH_S16));
        Ok(())
    }

    fn sqrt_to_depth(&mut self, depth: u32) {
        let p = prepare::s16_sqrt(self.exp, self.hr);
        self.hr = vect::s16::sqrt(&mut self.data, p.b_shr, depth);
        self.exp = p.a_exp;
    }

    /// Element-wise reciprocal. Zero elements saturate.
    pub fn inverse(&mut self) {
        let p = prepare::s16_inverse(&self.data, self.exp);
        self.hr = vect::s16::inverse(&mut self.data, p.scale);
        self.exp = p.a_exp;
    }

    pub fn sum(&self) -> FloatS32 {
        FloatS32::new(vect::s16::sum(&self.data), self.exp)
    }

    pub fn abs_sum(&self) -> FloatS32 {
        FloatS32::new(vect::s16::abs_sum(&self.data), self.exp)
    }

    pub fn dot(&self, c: &Self, saturation: Saturation) -> Result<FloatS64> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::s16_dot(self.exp, c.exp, self.hr, c.hr, self.len(), saturation);
        let mant = vect::s16::dot(&self.data, &c.data, p.b_shr, p.c_shr);
        Ok(FloatS64::new(mant.into(), p.a_exp))
    }

    /// Sum of squares. Exact for any length.
    pub fn energy(&self) -> FloatS64 {
        FloatS64::new(vect::s16::energy(&self.data, 0), 2 * self.exp)
    }

    /// Mean, returned with a mantissa in 16-bit range.
    pub fn mean(&self) -> Result<FloatS32> {
        ensure_non_empty(self.len())?;
        let sum = vect::s16::sum(&self.data) as i64;
        let hr = hr_s32(sum as i32) + 32;
        let mean = (sum << hr) / self.len() as i64;
        let shr = (48 - hr_s64(mean) as i32).max(0);
        let mean = if shr > 0 {
            (mean + (1i64 << (shr - 1))) >> shr
        } else {
            mean
        };
        Ok(FloatS32::new(sat32(mean), self.exp - hr as i32 + shr))
    }

    /// Root mean square, computed from the energy with scalar arithmetic.
    pub fn rms(&self) -> Result<FloatS32> {
        ensure_non_empty(self.len())?;
        let energy = s64_to_s32(self.energy());
        let inv_len = s32_inverse(FloatS32::new(self.len() as i32, 0));
        Ok(s32_sqrt(s32_mul(energy, inv_len), SQRT_DEPTH_S32))
    }

    /// `self += b * c`.
    pub fn macc(&mut self, b: &Self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), b.len())?;
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::s16_macc(self.exp, b.exp, c.exp, self.hr, b.hr, c.hr);
        self.hr = vect::s16::macc(&mut self.data, &b.data, &c.data, p.acc_shr, p.bc_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// `self -= b * c`.
    pub fn nmacc(&mut self, b: &Self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), b.len())?;
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::s16_macc(self.exp, b.exp, c.exp, self.hr, b.hr, c.hr);
        self.hr = vect::s16::nmacc(&mut self.data, &b.data, &c.data, p.acc_shr, p.bc_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// Widens to 32-bit mantissas. Exact.
    pub fn to_s32(&self) -> BfpS32 {
        let p = prepare::s16_to_s32(self.exp);
        let mut data = vec![0i32; self.len()];
        let hr = vect::s32::from_s16(&mut data, &self.data);
        BfpS32 {
            data,
            exp: p.a_exp,
            hr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {}, got {} (tolerance {})",
            expected,
            actual,
            tol
        );
    }

    #[test]
    fn test_mul_values() {
        let mut b = BfpS16::from_f64(&[0.5, -1.5, 3.0]);
        let c = BfpS16::from_f64(&[2.0, 2.0, -0.25]);
        b.mul(&c).unwrap();
        let out = b.to_f64();
        for (x, y) in out.iter().zip([1.0, -3.0, -0.75]) {
            assert_close(*x, y, 1e-3);
        }
        assert_eq!(b.hr, vect::headroom(&b.data));
    }

    #[test]
    fn test_scale_and_clip() {
        let mut b = BfpS16::from_f64(&[1.0, -2.0, 4.0]);
        b.scale(0x4000, -14, Saturation::Avoid);
        assert_eq!(b.to_f64(), vec![1.0, -2.0, 4.0]);

        b.clip(-0x0C, 0x0C, -2).unwrap();
        assert_eq!(b.to_f64(), vec![1.0, -2.0, 3.0]);

        assert!(matches!(
            b.clip(5, 4, 0),
            Err(BfpError::InvalidBounds { lower: 5, upper: 4 })
        ));
    }

    #[test]
    fn test_clip_below_every_element() {
        let mut b = BfpS16::new(vec![100, 200, -300], -40);
        b.clip(-3, -1, 0).unwrap();
        assert_eq!(b.data, vec![-1, -1, -1]);
        assert_eq!(b.exp, 0);
    }

    #[test]
    fn test_sqrt_and_inverse() {
        let mut b = BfpS16::from_f64(&[4.0, 9.0, 0.25]);
        b.sqrt();
        let out = b.to_f64();
        for (x, y) in out.iter().zip([2.0, 3.0, 0.5]) {
            assert_close(*x, y, 1e-3);
        }

        let mut b = BfpS16::from_f64(&[2.0, -4.0, 0.5]);
        b.inverse();
        let out = b.to_f64();
        for (x, y) in out.iter().zip([0.5, -0.25, 2.0]) {
            assert_close(*x, y, 1e-3);
        }
    }

    #[test]
    fn test_sqrt_depth_validation() {
        let mut b = BfpS16::from_f64(&[4.0]);
        assert_eq!(
            b.sqrt_with_depth(0),
            Err(BfpError::InvalidDepth {
                depth: 0,
                max: SQRT_MAX_DEPTH_S16
            })
        );
        b.sqrt_with_depth(40).unwrap();
        assert_close(b.to_f64()[0], 2.0, 1e-3);
    }

    #[test]
    fn test_reductions() {
        let b = BfpS16::new(vec![100, -200, 300, 400], -2);
        assert_eq!(b.sum(), FloatS32::new(600, -2));
        assert_eq!(b.abs_sum(), FloatS32::new(1000, -2));
        assert_eq!(b.energy(), FloatS64::new(300_000, -4));
        assert_close(b.mean().unwrap().to_f64(), 37.5, 1e-9);
        assert_close(
            b.rms().unwrap().to_f64(),
            (300_000.0f64 / 16.0 / 4.0).sqrt(),
            1e-6,
        );

        let c = BfpS16::new(vec![1, 1, 1, 1], 0);
        let dot = b.dot(&c, Saturation::Avoid).unwrap();
        assert_close(dot.to_f64(), 150.0, 1e-9);
    }

    #[test]
    fn test_macc_and_conversion() {
        let mut acc = BfpS16::from_f64(&[1.0, 2.0]);
        let b = BfpS16::from_f64(&[0.5, 1.0]);
        let c = BfpS16::from_f64(&[2.0, -2.0]);
        acc.macc(&b, &c).unwrap();
        let out = acc.to_f64();
        assert_close(out[0], 2.0, 1e-3);
        assert_close(out[1], 0.0, 1e-3);

        acc.nmacc(&b, &c).unwrap();
        let out = acc.to_f64();
        assert_close(out[0], 1.0, 1e-3);
        assert_close(out[1], 2.0, 1e-3);

        let wide = acc.to_s32();
        assert_eq!(wide.to_f64(), acc.to_f64());
        assert_eq!(wide.hr, acc.hr + 8);
    }

    #[test]
    fn test_empty_reductions() {
        let b = BfpS16::new(Vec::new(), 0);
        assert_eq!(b.mean(), Err(BfpError::EmptyVector));
        assert_eq!(b.rms(), Err(BfpError::EmptyVector));
    }
}
