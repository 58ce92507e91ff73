//! Element-wise kernels over caller-owned mantissa buffers.
//!
//! Kernels never allocate and never validate: lengths must agree and shifts must come from the
//! matching [`crate::prepare`] function. Binary kernels work in place, reading the first operand
//! from the output buffer (`a = a op c`). Every kernel that writes mantissas returns the exact
//! headroom of what it wrote.
//!
//! Width-agnostic kernels live here, generic over [`Mantissa`]. Width-specific arithmetic is in
//! [`s16`] and [`s32`], complex kernels in [`complex_s16`] (split real/imaginary arrays) and
//! [`complex_s32`] (interleaved `Complex<i32>`).

pub mod complex_s16;
pub mod complex_s32;
pub mod par;
pub mod s16;
pub mod s32;

use crate::traits::Mantissa;
use crate::vpu::{Headroom, LeftShift, RightShift};

/// Headroom of the worst-case element. An empty slice has full headroom.
#[inline(always)]
pub fn headroom<T: Mantissa>(b: &[T]) -> Headroom {
    b.iter()
        .map(|&x| x.headroom())
        .min()
        .unwrap_or(T::BITS - 1)
}

/// Left shift (negative: right shift) with saturation.
pub fn shl<T: Mantissa>(a: &mut [T], shl: LeftShift) -> Headroom {
    for x in a.iter_mut() {
        *x = x.vlashr(-shl);
    }
    headroom(a)
}

/// Right shift (negative: left shift) with saturation.
pub fn shr<T: Mantissa>(a: &mut [T], shr: RightShift) -> Headroom {
    for x in a.iter_mut() {
        *x = x.vlashr(shr);
    }
    headroom(a)
}

pub fn set<T: Mantissa>(a: &mut [T], value: T) -> Headroom {
    a.fill(value);
    if a.is_empty() {
        T::BITS - 1
    } else {
        value.headroom()
    }
}

pub fn copy<T: Mantissa>(a: &mut [T], b: &[T]) -> Headroom {
    debug_assert_eq!(a.len(), b.len());
    a.copy_from_slice(b);
    headroom(a)
}

/// `a = (a >> b_shr) + (c >> c_shr)`, saturating.
pub fn add<T: Mantissa>(a: &mut [T], c: &[T], b_shr: RightShift, c_shr: RightShift) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        *x = T::saturate(x.vlashr(b_shr).widen() + y.vlashr(c_shr).widen());
    }
    headroom(a)
}

/// `a = (a >> b_shr) - (c >> c_shr)`, saturating.
pub fn sub<T: Mantissa>(a: &mut [T], c: &[T], b_shr: RightShift, c_shr: RightShift) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        *x = T::saturate(x.vlashr(b_shr).widen() - y.vlashr(c_shr).widen());
    }
    headroom(a)
}

/// `a = (a >> b_shr) + c` for a scalar `c` already at the output exponent.
pub fn add_scalar<T: Mantissa>(a: &mut [T], c: T, b_shr: RightShift) -> Headroom {
    for x in a.iter_mut() {
        *x = T::saturate(x.vlashr(b_shr).widen() + c.widen());
    }
    headroom(a)
}

/// Absolute value. The most negative value maps to `VPU_MAX`.
pub fn abs<T: Mantissa>(a: &mut [T]) -> Headroom {
    for x in a.iter_mut() {
        *x = T::saturate(x.widen().abs());
    }
    headroom(a)
}

/// Clamps negative elements to zero.
pub fn rect<T: Mantissa>(a: &mut [T]) -> Headroom {
    for x in a.iter_mut() {
        *x = (*x).max(T::ZERO);
    }
    headroom(a)
}

/// Clamps `a >> b_shr` to `[lower, upper]`.
pub fn clip<T: Mantissa>(a: &mut [T], lower: T, upper: T, b_shr: RightShift) -> Headroom {
    debug_assert!(lower <= upper);
    for x in a.iter_mut() {
        *x = x.vlashr(b_shr).clamp(lower, upper);
    }
    headroom(a)
}

pub fn max<T: Mantissa>(b: &[T]) -> T {
    debug_assert!(!b.is_empty());
    b.iter().copied().max().unwrap_or(T::ZERO)
}

pub fn min<T: Mantissa>(b: &[T]) -> T {
    debug_assert!(!b.is_empty());
    b.iter().copied().min().unwrap_or(T::ZERO)
}

/// Index of the first largest element.
pub fn argmax<T: Mantissa>(b: &[T]) -> usize {
    let mut best = 0;
    for (i, &x) in b.iter().enumerate().skip(1) {
        if x > b[best] {
            best = i;
        }
    }
    best
}

/// Index of the first smallest element.
pub fn argmin<T: Mantissa>(b: &[T]) -> usize {
    let mut best = 0;
    for (i, &x) in b.iter().enumerate().skip(1) {
        if x < b[best] {
            best = i;
        }
    }
    best
}

/// `a = max(a >> b_shr, c >> c_shr)`.
pub fn max_elementwise<T: Mantissa>(
    a: &mut [T],
    c: &[T],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        *x = x.vlashr(b_shr).max(y.vlashr(c_shr));
    }
    headroom(a)
}

/// `a = min(a >> b_shr, c >> c_shr)`.
pub fn min_elementwise<T: Mantissa>(
    a: &mut [T],
    c: &[T],
    b_shr: RightShift,
    c_shr: RightShift,
) -> Headroom {
    debug_assert_eq!(a.len(), c.len());
    for (x, &y) in a.iter_mut().zip(c) {
        *x = x.vlashr(b_shr).min(y.vlashr(c_shr));
    }
    headroom(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headroom_exhaustive_boundaries() {
        assert_eq!(headroom::<i16>(&[]), 15);
        assert_eq!(headroom(&[0i16, -1]), 15);
        assert_eq!(headroom(&[0i16, i16::MIN + 1]), 0);
        assert_eq!(headroom(&[0x0F00i16, -0x0100]), 3);
        assert_eq!(headroom(&[i32::MAX, 0]), 0);
        assert_eq!(headroom(&[1i32, -2, 3]), 29);
    }

    #[test]
    fn test_shift_uses_all_headroom_and_no_more() {
        let original = [0x0123i16, -0x0456, 0x0001];
        let hr = headroom(&original);

        let mut shifted = original;
        shl(&mut shifted, hr as i32);
        assert_eq!(headroom(&shifted), 0);
        shr(&mut shifted, hr as i32);
        assert_eq!(shifted, original);

        let mut over = original;
        shl(&mut over, hr as i32 + 1);
        shr(&mut over, hr as i32 + 1);
        assert_ne!(over, original);
    }

    #[test]
    fn test_add_sub_saturate_symmetrically() {
        let mut a = [0x7000i16, -0x7000];
        let hr = add(&mut a, &[0x7000, -0x7000], 0, 0);
        assert_eq!(a, [0x7FFF, -0x7FFF]);
        assert_eq!(hr, 0);

        let mut a = [100i32, -100];
        sub(&mut a, &[50, 50], 1, 0);
        assert_eq!(a, [0, -100]);
    }

    #[test]
    fn test_abs_rect_clip() {
        let mut a = [i16::MIN, -3, 4];
        abs(&mut a);
        assert_eq!(a, [0x7FFF, 3, 4]);

        let mut a = [-7i32, 0, 9];
        rect(&mut a);
        assert_eq!(a, [0, 0, 9]);

        let mut a = [-100i32, 5, 100];
        clip(&mut a, -10, 20, 0);
        assert_eq!(a, [-10, 5, 20]);
    }

    #[test]
    fn test_arg_extrema_first_occurrence() {
        let b = [3i16, 9, -2, 9, -2];
        assert_eq!(max(&b), 9);
        assert_eq!(min(&b), -2);
        assert_eq!(argmax(&b), 1);
        assert_eq!(argmin(&b), 2);
    }

    #[test]
    fn test_elementwise_extrema() {
        let mut a = [4i32, -8, 0];
        let hr = max_elementwise(&mut a, &[2, 6, -6], 1, 0);
        assert_eq!(a, [2, 6, 0]);
        assert_eq!(hr, 28);

        let mut a = [4i32, -8, 0];
        min_elementwise(&mut a, &[2, 6, -6], 0, 0);
        assert_eq!(a, [2, -8, -6]);
    }

    #[test]
    fn test_set_and_add_scalar() {
        let mut a = [0i16; 4];
        assert_eq!(set(&mut a, 0x0100), 6);
        add_scalar(&mut a, 0x0010, 4);
        assert_eq!(a, [0x0020; 4]);
    }
}
