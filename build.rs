use std::env;
use std::f64::consts::PI;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::PathBuf;

// Largest FFT (log2) the generated twiddle table supports. Keep in sync with `MAX_FFT_LOG2` in lib.rs.
const MAX_FFT_LOG2: u32 = 10;

// Rows of the magnitude rotation tables
const ROT_TABLE32_ROWS: u32 = 30;
const ROT_TABLE16_ROWS: u32 = 14;

// A constant lookup table emitted into OUT_DIR and pulled in with `include!`
trait LutGenerator {
    fn name(&self) -> &'static str;
    fn emit(&self, out: &mut String) -> fmt::Result;
}

fn q_round(value: f64, frac_bits: u32, max: i64) -> i64 {
    let scaled = (value * (1u64 << frac_bits) as f64).round() as i64;
    scaled.clamp(-max, max)
}

// Twiddle factors for every butterfly stage whose half-span `b` is at least 4. Stage `b` occupies
// `b` consecutive entries starting at offset `b - 4`, holding exp(-2*pi*j*p / (2*b)) in Q30.
struct TwiddleTable {
    max_fft_log2: u32,
}

impl TwiddleTable {
    fn entries(&self) -> Vec<(i64, i64)> {
        let mut entries = Vec::new();
        let mut span = 4usize;
        while span < (1usize << self.max_fft_log2) {
            for p in 0..span {
                let theta = -2.0 * PI * (p as f64) / (2.0 * span as f64);
                entries.push((
                    q_round(theta.cos(), 30, i32::MAX as i64),
                    q_round(theta.sin(), 30, i32::MAX as i64),
                ));
            }
            span <<= 1;
        }
        entries
    }
}

impl LutGenerator for TwiddleTable {
    fn name(&self) -> &'static str {
        "FFT_TWIDDLES"
    }

    fn emit(&self, out: &mut String) -> fmt::Result {
        let entries = self.entries();
        writeln!(
            out,
            "pub(crate) static {}: [Complex<i32>; {}] = [",
            self.name(),
            entries.len()
        )?;
        for (re, im) in entries {
            writeln!(out, "    Complex {{ re: {re}, im: {im} }},")?;
        }
        writeln!(out, "];\n")
    }
}

// Rotations by -pi/2^(k+2) used to walk a first-quadrant vector onto the real axis.
struct RotationTable32 {
    rows: u32,
}

impl LutGenerator for RotationTable32 {
    fn name(&self) -> &'static str {
        "ROT_TABLE32"
    }

    fn emit(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "pub(crate) static {}: [Complex<i32>; {}] = [",
            self.name(),
            self.rows
        )?;
        for k in 0..self.rows {
            let theta = PI / f64::from(1u32 << (k + 2));
            let re = q_round(theta.cos(), 30, i32::MAX as i64);
            let im = -q_round(theta.sin(), 30, i32::MAX as i64);
            writeln!(out, "    Complex {{ re: {re}, im: {im} }},")?;
        }
        writeln!(out, "];\n")
    }
}

struct RotationTable16 {
    rows: u32,
}

impl LutGenerator for RotationTable16 {
    fn name(&self) -> &'static str {
        "ROT_TABLE16"
    }

    fn emit(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "pub(crate) static {}: [(i16, i16); {}] = [",
            self.name(),
            self.rows
        )?;
        for k in 0..self.rows {
            let theta = PI / f64::from(1u32 << (k + 2));
            let re = q_round(theta.cos(), 15, 0x7FFF);
            let im = -q_round(theta.sin(), 15, 0x7FFF);
            writeln!(out, "    ({re}, {im}),")?;
        }
        writeln!(out, "];\n")
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let generators: Vec<Box<dyn LutGenerator>> = vec![
        Box::new(TwiddleTable {
            max_fft_log2: MAX_FFT_LOG2,
        }),
        Box::new(RotationTable32 {
            rows: ROT_TABLE32_ROWS,
        }),
        Box::new(RotationTable16 {
            rows: ROT_TABLE16_ROWS,
        }),
    ];

    let mut source = String::from("// Generated by build.rs. Do not edit.\n\n");
    for generator in &generators {
        generator
            .emit(&mut source)
            .expect("Failed to format lookup tables");
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("luts.rs"), source).expect("Failed to write lookup tables");
}
