use tracing::warn;

use super::{BfpS16, BfpS32};
use crate::error::{ensure_non_empty, ensure_same_len, BfpError, Result};
use crate::prepare::{self, Saturation};
use crate::scalar::{s32_inverse, s32_mul, s32_sqrt, s64_to_s32, FloatS32, FloatS64};
use crate::traits::ParallelKernel;
use crate::vect;
use crate::vpu::{hr_s32, hr_s64, sat32, Exponent};
use crate::{SQRT_DEPTH_S32, SQRT_MAX_DEPTH_S32};

impl BfpS32 {
    pub fn mul(&mut self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::s32_mul(self.exp, c.exp, self.hr, c.hr);
        self.hr = vect::s32::mul(&mut self.data, &c.data, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// [`BfpS32::mul`] over chunks on the rayon pool.
    pub fn par_mul(&mut self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::s32_mul(self.exp, c.exp, self.hr, c.hr);
        self.hr = self.data.as_mut_slice().par_mul(c.data.as_slice(), p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// [`BfpS32::add`](super::Bfp::add) over chunks on the rayon pool.
    pub fn par_add(&mut self, c: &Self, saturation: Saturation) -> Result<()> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::add_sub(self.exp, c.exp, self.hr, c.hr, saturation);
        self.hr = self.data.as_mut_slice().par_add(c.data.as_slice(), p.b_shr, p.c_shr);
        self.exp = p.a_exp;
        Ok(())
    }

    /// Multiplies every element by `alpha * 2^alpha_exp`.
    pub fn scale(&mut self, alpha: i32, alpha_exp: Exponent) {
        let p = prepare::s32_mul(self.exp, alpha_exp, self.hr, hr_s32(alpha));
        self.hr = vect::s32::scale(&mut self.data, alpha, p.b_shr, p.c_shr);
        self.exp = p.a_exp;
    }

    /// Clamps every element to `[lower, upper] * 2^bound_exp`.
    pub fn clip(&mut self, lower: i32, upper: i32, bound_exp: Exponent) -> Result<()> {
        if lower > upper {
            return Err(BfpError::InvalidBounds {
                lower: lower.into(),
                upper: upper.into(),
            });
        }
        let params = prepare::s32_clip(self.exp, bound_exp, lower, upper);
        self.apply_clip(params, lower, upper, bound_exp);
        Ok(())
    }

    pub fn sqrt(&mut self) {
        self.sqrt_to_depth(SQRT_DEPTH_S32);
    }

    pub fn sqrt_with_depth(&mut self, depth: u32) -> Result<()> {
        if depth == 0 {
            return Err(BfpError::InvalidDepth {
                depth,
                max: SQRT_MAX_DEPTH_S32,
            });
        }
        if depth > SQRT_MAX_DEPTH_S32 {
            warn!(depth, max = SQRT_MAX_DEPTH_S32, "sqrt depth clamped");
        }
        self.sqrt_to_depth(depth.min(SQRT_MAX_DEPTH_S32));
        Ok(())
    }

    fn sqrt_to_depth(&mut self, depth: u32) {
        let p = prepare::s32_sqrt(self.exp, self.hr);
        self.hr = vect::s32::sqrt(&mut self.data, p.b_shr, depth);
        self.exp = p.a_exp;
    }

    pub fn inverse(&mut self) {
        let p = prepare::s32_inverse(&self.data, self.exp);
        self.hr = vect::s32::inverse(&mut self.data, p.scale);
        self.exp = p.a_exp;
    }

    /// Sum in a 40-bit accumulator.
    pub fn sum(&self) -> FloatS64 {
        FloatS64::new(vect::s32::sum(&self.data), self.exp)
    }

    pub fn abs_sum(&self) -> FloatS64 {
        FloatS64::new(vect::s32::abs_sum(&self.data), self.exp)
    }

    pub fn dot(&self, c: &Self, saturation: Saturation) -> Result<FloatS64> {
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::s32_dot(self.exp, c.exp, self.hr, c.hr, self.len(), saturation);
        let mant = vect::s32::dot(&self.data, &c.data, p.b_shr, p.c_shr);
        Ok(FloatS64::new(mant, p.a_exp))
    }

    pub fn energy(&self) -> FloatS64 {
        let p = prepare::s32_energy(self.exp, self.hr, self.len());
        FloatS64::new(vect::s32::energy(&self.data, p.b_shr), p.a_exp)
    }

    pub fn mean(&self) -> Result<FloatS32> {
        ensure_non_empty(self.len())?;
        let sum = vect::s32::sum(&self.data);
        let hr = hr_s64(sum);
        let mean = (sum << hr) / self.len() as i64;
        let shr = (32 - hr_s64(mean) as i32).max(0);
        let mean = if shr > 0 {
            (mean + (1i64 << (shr - 1))) >> shr
        } else {
            mean
        };
        Ok(FloatS32::new(sat32(mean), self.exp - hr as i32 + shr))
    }

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
        let p = prepare::s32_macc(self.exp, b.exp, c.exp, self.hr, b.hr, c.hr);
        self.hr = vect::s32::macc(
            &mut self.data,
            &b.data,
            &c.data,
            p.acc_shr,
            p.b_shr,
            p.c_shr,
        );
        self.exp = p.a_exp;
        Ok(())
    }

    /// `self -= b * c`.
    pub fn nmacc(&mut self, b: &Self, c: &Self) -> Result<()> {
        ensure_same_len(self.len(), b.len())?;
        ensure_same_len(self.len(), c.len())?;
        let p = prepare::s32_macc(self.exp, b.exp, c.exp, self.hr, b.hr, c.hr);
        self.hr = vect::s32::nmacc(
            &mut self.data,
            &b.data,
            &c.data,
            p.acc_shr,
            p.b_shr,
            p.c_shr,
        );
        self.exp = p.a_exp;
        Ok(())
    }

    /// Narrows to 16-bit mantissas, rounding away the low bits.
    pub fn to_s16(&self, saturation: Saturation) -> BfpS16 {
        let p = prepare::s32_to_s16(self.exp, self.hr, saturation);
        let mut data = vec![0i16; self.len()];
        let hr = vect::s16::from_s32(&mut data, &self.data, p.b_shr);
        BfpS16 {
            data,
            exp: p.a_exp,
            hr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_all_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).abs() <= tol,
                "index {}: expected {}, got {} (tolerance {})",
                i,
                e,
                a,
                tol
            );
        }
    }

    #[test]
    fn test_mul_scale_clip() {
        let mut b = BfpS32::from_f64(&[0.5, -1.5, 3.0]);
        let c = BfpS32::from_f64(&[2.0, 2.0, -0.25]);
        b.mul(&c).unwrap();
        assert_eq!(b.to_f64(), vec![1.0, -3.0, -0.75]);

        b.scale(0x2000_0000, -28);
        assert_all_close(&b.to_f64(), &[2.0, -6.0, -1.5], 1e-7);

        let mut b = BfpS32::from_f64(&[1.0, -2.0, 4.0]);
        b.clip(-3, 3, 0).unwrap();
        assert_eq!(b.to_f64(), vec![1.0, -2.0, 3.0]);
    }

    #[test]
    fn test_sqrt_and_inverse_exact() {
        let mut b = BfpS32::from_f64(&[4.0, 9.0, 0.25]);
        b.sqrt();
        assert_eq!(b.to_f64(), vec![2.0, 3.0, 0.5]);

        let mut b = BfpS32::from_f64(&[2.0, -4.0, 0.5]);
        b.inverse();
        assert_eq!(b.to_f64(), vec![0.5, -0.25, 2.0]);
    }

    #[test]
    fn test_sqrt_depth_limits_precision() {
        let mut full = BfpS32::from_f64(&[2.0]);
        let mut coarse = full.clone();
        full.sqrt();
        coarse.sqrt_with_depth(4).unwrap();
        let f = full.to_f64()[0];
        let c = coarse.to_f64()[0];
        assert!(c <= f);
        assert!(f - c < 0.25, "full {} coarse {}", f, c);
        assert!(coarse.sqrt_with_depth(0).is_err());
    }

    #[test]
    fn test_statistics() {
        let b = BfpS32::new(vec![100, -200, 300, 400], -2);
        assert_eq!(b.sum(), FloatS64::new(600, -2));
        assert_eq!(b.abs_sum(), FloatS64::new(1000, -2));
        assert_eq!(b.energy().to_f64(), 18750.0);
        assert_eq!(b.mean().unwrap().to_f64(), 37.5);
        assert!((b.rms().unwrap().to_f64() - 4687.5f64.sqrt()).abs() < 1e-6);

        let x = BfpS32::from_f64(&[1.0, 2.0, 3.0]);
        let y = BfpS32::from_f64(&[4.0, 5.0, 6.0]);
        assert_eq!(x.dot(&y, Saturation::Avoid).unwrap().to_f64(), 32.0);
    }

    #[test]
    fn test_macc_nmacc() {
        let mut acc = BfpS32::from_f64(&[1.0, -1.0, 0.5]);
        let b = BfpS32::from_f64(&[0.25, 2.0, -3.0]);
        let c = BfpS32::from_f64(&[4.0, 0.5, 1.0]);
        acc.macc(&b, &c).unwrap();
        assert_all_close(&acc.to_f64(), &[2.0, 0.0, -2.5], 1e-7);
        acc.nmacc(&b, &c).unwrap();
        assert_all_close(&acc.to_f64(), &[1.0, -1.0, 0.5], 1e-7);
        assert_eq!(acc.hr, vect::headroom(&acc.data));
    }

    #[test]
    fn test_narrowing() {
        let b = BfpS32::from_f64(&[1.0, -0.5]);
        let narrow = b.to_s16(Saturation::Avoid);
        assert_eq!(narrow.to_f64(), vec![1.0, -0.5]);
        assert_eq!(narrow.exp, b.exp + 16);
    }

    #[test]
    fn test_par_ops_match_sequential() {
        let mut rng = StdRng::seed_from_u64(12345);
        let len = 3 * vect::par::PAR_CHUNK_SIZE + 3;
        let b: Vec<f64> = (0..len).map(|_| rng.random_range(-4.0..4.0)).collect();
        let c: Vec<f64> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
        let b = BfpS32::from_f64(&b);
        let c = BfpS32::from_f64(&c);

        let mut seq = b.clone();
        let mut par = b.clone();
        seq.add(&c, Saturation::Avoid).unwrap();
        par.par_add(&c, Saturation::Avoid).unwrap();
        assert_eq!(seq, par);

        let mut seq = b.clone();
        let mut par = b;
        seq.mul(&c).unwrap();
        par.par_mul(&c).unwrap();
        assert_eq!(seq, par);

        let short = BfpS32::new(vec![1], 0);
        assert_eq!(
            par.par_mul(&short),
            Err(crate::error::length_mismatch(len, 1))
        );
    }
}
