use std::fmt::Debug;

use crate::vpu::{self, Headroom, RightShift};

/// A fixed-point mantissa lane of the vector unit.
///
/// Implemented for `i16` and `i32` so the element-wise kernels that behave identically at both
/// widths are written once.
pub trait Mantissa: Copy + Ord + Default + Debug + Send + Sync + 'static {
    const BITS: u32;
    const VPU_MIN: Self;
    const VPU_MAX: Self;
    const ZERO: Self;

    fn headroom(self) -> Headroom;
    fn widen(self) -> i64;
    /// Clamps a wide value into `[VPU_MIN, VPU_MAX]`.
    fn saturate(value: i64) -> Self;
    /// Arithmetic shift with the saturating semantics of `vlashr`.
    fn vlashr(self, shr: RightShift) -> Self;
}

impl Mantissa for i16 {
    const BITS: u32 = 16;
    const VPU_MIN: Self = vpu::VPU_INT16_MIN;
    const VPU_MAX: Self = vpu::VPU_INT16_MAX;
    const ZERO: Self = 0;

    #[inline(always)]
    fn headroom(self) -> Headroom {
        vpu::hr_s16(self)
    }

    #[inline(always)]
    fn widen(self) -> i64 {
        self as i64
    }

    #[inline(always)]
    fn saturate(value: i64) -> Self {
        vpu::sat16(value)
    }

    #[inline(always)]
    fn vlashr(self, shr: RightShift) -> Self {
        vpu::vlashr16(self, shr)
    }
}

impl Mantissa for i32 {
    const BITS: u32 = 32;
    const VPU_MIN: Self = vpu::VPU_INT32_MIN;
    const VPU_MAX: Self = vpu::VPU_INT32_MAX;
    const ZERO: Self = 0;

    #[inline(always)]
    fn headroom(self) -> Headroom {
        vpu::hr_s32(self)
    }

    #[inline(always)]
    fn widen(self) -> i64 {
        self as i64
    }

    #[inline(always)]
    fn saturate(value: i64) -> Self {
        vpu::sat32(value)
    }

    #[inline(always)]
    fn vlashr(self, shr: RightShift) -> Self {
        vpu::vlashr32(self, shr)
    }
}

/// Headroom scan with a sequential and a rayon-backed variant.
pub trait HeadroomScan {
    fn headroom(self) -> Headroom;
    fn par_headroom(self) -> Headroom;
}

/// Element-wise operations on 32-bit mantissa slices split into chunks processed on the rayon
/// pool. Each returns the headroom of the written output.
pub trait ParallelKernel<Rhs = Self> {
    fn par_add(self, c: Rhs, b_shr: RightShift, c_shr: RightShift) -> Headroom;
    fn par_mul(self, c: Rhs, b_shr: RightShift, c_shr: RightShift) -> Headroom;
    fn par_shl(self, shl: crate::vpu::LeftShift) -> Headroom;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mantissa_bounds_are_symmetric() {
        assert_eq!(<i16 as Mantissa>::VPU_MIN, -<i16 as Mantissa>::VPU_MAX);
        assert_eq!(<i32 as Mantissa>::VPU_MIN, -<i32 as Mantissa>::VPU_MAX);
        assert_eq!(<i16 as Mantissa>::saturate(i64::MIN), -0x7FFF);
        assert_eq!(<i32 as Mantissa>::saturate(1 << 40), 0x7FFF_FFFF);
    }

    #[test]
    fn test_mantissa_matches_vpu_model() {
        for x in [0i16, -1, 1, 0x4000, -0x4000, i16::MIN, i16::MAX] {
            assert_eq!(Mantissa::headroom(x), vpu::hr_s16(x));
            assert_eq!(Mantissa::vlashr(x, -2), vpu::vlashr16(x, -2));
        }
        for x in [0i32, -1, 7, i32::MIN, i32::MAX] {
            assert_eq!(Mantissa::headroom(x), vpu::hr_s32(x));
        }
    }
}
