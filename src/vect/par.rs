//! Rayon-backed variants of the hottest 32-bit kernels.
//!
//! Each output chunk is disjoint, so chunks run independently and the overall headroom is the
//! minimum of the per-chunk headrooms.

use num::Complex;
use rayon::prelude::*;

use crate::traits::{HeadroomScan, Mantissa, ParallelKernel};
use crate::vpu::{Headroom, LeftShift, RightShift};

/// Elements handed to one rayon task.
pub const PAR_CHUNK_SIZE: usize = 4096;

impl<T: Mantissa> HeadroomScan for &[T] {
    #[inline(always)]
    fn headroom(self) -> Headroom {
        super::headroom(self)
    }

    fn par_headroom(self) -> Headroom {
        self.par_chunks(PAR_CHUNK_SIZE)
            .map(super::headroom)
            .min()
            .unwrap_or(T::BITS - 1)
    }
}

impl HeadroomScan for &[Complex<i32>] {
    #[inline(always)]
    fn headroom(self) -> Headroom {
        super::complex_s32::complex_headroom(self)
    }

    fn par_headroom(self) -> Headroom {
        self.par_chunks(PAR_CHUNK_SIZE)
            .map(super::complex_s32::complex_headroom)
            .min()
            .unwrap_or(31)
    }
}

impl<'c> ParallelKernel<&'c [i32]> for &mut [i32] {
    fn par_add(self, c: &'c [i32], b_shr: RightShift, c_shr: RightShift) -> Headroom {
        debug_assert_eq!(self.len(), c.len());
        self.par_chunks_mut(PAR_CHUNK_SIZE)
            .zip(c.par_chunks(PAR_CHUNK_SIZE))
            .map(|(a_chunk, c_chunk)| super::add(a_chunk, c_chunk, b_shr, c_shr))
            .min()
            .unwrap_or(31)
    }

    fn par_mul(self, c: &'c [i32], b_shr: RightShift, c_shr: RightShift) -> Headroom {
        debug_assert_eq!(self.len(), c.len());
        self.par_chunks_mut(PAR_CHUNK_SIZE)
            .zip(c.par_chunks(PAR_CHUNK_SIZE))
            .map(|(a_chunk, c_chunk)| super::s32::mul(a_chunk, c_chunk, b_shr, c_shr))
            .min()
            .unwrap_or(31)
    }

    fn par_shl(self, shl: LeftShift) -> Headroom {
        self.par_chunks_mut(PAR_CHUNK_SIZE)
            .map(|a_chunk| super::shl(a_chunk, shl))
            .min()
            .unwrap_or(31)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_vec(rng: &mut StdRng, len: usize, bits: u32) -> Vec<i32> {
        let bound = 1i32 << bits;
        (0..len).map(|_| rng.random_range(-bound..bound)).collect()
    }

    #[test]
    fn test_par_headroom_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(12345);
        let b = random_vec(&mut rng, 3 * PAR_CHUNK_SIZE + 17, 20);
        assert_eq!(b.as_slice().par_headroom(), b.as_slice().headroom());

        let empty: &[i16] = &[];
        assert_eq!(empty.par_headroom(), 15);
    }

    #[test]
    fn test_par_kernels_match_sequential() {
        let mut rng = StdRng::seed_from_u64(12345);
        let len = 2 * PAR_CHUNK_SIZE + 5;
        let b = random_vec(&mut rng, len, 29);
        let c = random_vec(&mut rng, len, 29);

        let mut seq = b.clone();
        let mut par = b.clone();
        let hr_seq = super::super::add(&mut seq, &c, 1, 1);
        let hr_par = par.as_mut_slice().par_add(c.as_slice(), 1, 1);
        assert_eq!(seq, par);
        assert_eq!(hr_seq, hr_par);

        let mut seq = b.clone();
        let mut par = b.clone();
        let hr_seq = super::super::s32::mul(&mut seq, &c, 0, 0);
        let hr_par = par.as_mut_slice().par_mul(c.as_slice(), 0, 0);
        assert_eq!(seq, par);
        assert_eq!(hr_seq, hr_par);

        let mut seq = b.clone();
        let mut par = b;
        assert_eq!(
            super::super::shl(&mut seq, 1),
            par.as_mut_slice().par_shl(1)
        );
        assert_eq!(seq, par);
    }
}
