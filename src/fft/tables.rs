//! Constant lookup tables generated by `build.rs`.
//!
//! * `FFT_TWIDDLES`: Q30 twiddles for every butterfly stage with half-span `b >= 4`, stage `b` at
//!   offset `b - 4`, natural order.
//! * `ROT_TABLE32` / `ROT_TABLE16`: rotations by `-pi / 2^(k+2)` for the magnitude kernels.

use num::Complex;

include!(concat!(env!("OUT_DIR"), "/luts.rs"));
