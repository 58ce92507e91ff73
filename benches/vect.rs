//! BFP Vector Operation Benchmarks
//!
//! Measures the element-wise BFP operations across vector sizes, comparing the sequential
//! kernels with their rayon-backed counterparts and with a plain `f64` baseline.
//!
//! # Benchmark Categories
//!
//! - **Addition**: `BfpS32::add` vs `BfpS32::par_add` vs `f64` addition
//! - **Multiplication**: `BfpS32::mul` vs `BfpS32::par_mul`
//! - **Reductions**: 16- and 32-bit dot products and energy

use std::hint::black_box;

use bfpmath::{BfpS16, BfpS32, Saturation};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ================================================================================================
// BENCHMARK CONFIGURATION
// ================================================================================================

/// Vector sizes from L1-resident up to well past L2.
const VECTOR_SIZES: &[usize] = &[256, 1_024, 16_384, 262_144, 1_048_576];

// ================================================================================================
// TEST DATA GENERATION
// ================================================================================================

fn generate_test_data(len: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(42);
    let b = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
    let c = (0..len).map(|_| rng.random_range(-100.0..100.0)).collect();
    (b, c)
}

// ================================================================================================
// BENCHMARK IMPLEMENTATIONS
// ================================================================================================

fn benchmark_add(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("BFP add {size}"));
        group.throughput(Throughput::Elements(size as u64));

        let (b_f64, c_f64) = generate_test_data(size);
        let b = BfpS32::from_f64(&b_f64);
        let rhs = BfpS32::from_f64(&c_f64);

        group.bench_with_input(BenchmarkId::new("f64", size), &(&b_f64, &c_f64), |bench, (x, y)| {
            bench.iter(|| {
                let sum: Vec<f64> = x.iter().zip(y.iter()).map(|(p, q)| p + q).collect();
                black_box(sum)
            })
        });

        group.bench_with_input(BenchmarkId::new("sequential", size), &rhs, |bench, rhs| {
            bench.iter_batched(
                || b.clone(),
                |mut a| {
                    a.add(black_box(rhs), Saturation::Avoid).unwrap();
                    black_box(a)
                },
                criterion::BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &rhs, |bench, rhs| {
            bench.iter_batched(
                || b.clone(),
                |mut a| {
                    a.par_add(black_box(rhs), Saturation::Avoid).unwrap();
                    black_box(a)
                },
                criterion::BatchSize::LargeInput,
            )
        });

        group.finish();
    }
}

fn benchmark_mul(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("BFP mul {size}"));
        group.throughput(Throughput::Elements(size as u64));

        let (b_f64, c_f64) = generate_test_data(size);
        let b = BfpS32::from_f64(&b_f64);
        let rhs = BfpS32::from_f64(&c_f64);

        group.bench_with_input(BenchmarkId::new("sequential", size), &rhs, |bench, rhs| {
            bench.iter_batched(
                || b.clone(),
                |mut a| {
                    a.mul(black_box(rhs)).unwrap();
                    black_box(a)
                },
                criterion::BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &rhs, |bench, rhs| {
            bench.iter_batched(
                || b.clone(),
                |mut a| {
                    a.par_mul(black_box(rhs)).unwrap();
                    black_box(a)
                },
                criterion::BatchSize::LargeInput,
            )
        });

        group.finish();
    }
}

fn benchmark_reductions(c: &mut Criterion) {
    let mut group = c.benchmark_group("BFP reductions");
    for &size in VECTOR_SIZES {
        group.throughput(Throughput::Elements(size as u64));

        let (b_f64, c_f64) = generate_test_data(size);
        let b32 = BfpS32::from_f64(&b_f64);
        let c32 = BfpS32::from_f64(&c_f64);
        let b16 = BfpS16::from_f64(&b_f64);
        let c16 = BfpS16::from_f64(&c_f64);

        group.bench_function(BenchmarkId::new("dot_s16", size), |bench| {
            bench.iter(|| black_box(b16.dot(black_box(&c16), Saturation::Avoid)))
        });
        group.bench_function(BenchmarkId::new("dot_s32", size), |bench| {
            bench.iter(|| black_box(b32.dot(black_box(&c32), Saturation::Avoid)))
        });
        group.bench_function(BenchmarkId::new("energy_s32", size), |bench| {
            bench.iter(|| black_box(black_box(&b32).energy()))
        });
    }
    group.finish();
}

// ================================================================================================
// CRITERION INTEGRATION
// ================================================================================================

criterion_group!(benches, benchmark_add, benchmark_mul, benchmark_reductions);
criterion_main!(benches);
