//! Criterion benchmarks for spectral_core operations.
//!
//! Run with: cargo bench -p spectral_core
//! Run specific: cargo bench -p spectral_core -- fft2d

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array2;
use rand::prelude::*;
use rustfft::num_complex::Complex as RefComplex;
use rustfft::FftPlanner;

use spectral_core::codec::{decode, encode};
use spectral_core::denoise::denoise_spectrum_image;
use spectral_core::{
    fft2d, forward_1d, ifft2d, remove_periodic_noise, Complex, FilterKind, FrequencyFilter,
    SpectralConfig,
};

// =============================================================================
// Helper Functions for Test Data Generation
// =============================================================================

fn random_matrix_f64(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.gen())
}

fn random_sequence(n: usize, seed: u64) -> Vec<Complex<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Complex::new(rng.gen(), rng.gen())).collect()
}

// =============================================================================
// FFT Benchmarks
// =============================================================================

fn bench_fft1d(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft1d");
    let mut planner = FftPlanner::<f64>::new();

    for size in [64usize, 256, 1024, 4096] {
        let input = random_sequence(size, 42);
        let plan = planner.plan_fft_forward(size);
        let reference: Vec<RefComplex<f64>> =
            input.iter().map(|z| RefComplex::new(z.re, z.im)).collect();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("recursive", size), &size, |b, _| {
            b.iter(|| forward_1d(black_box(&input)))
        });

        group.bench_with_input(BenchmarkId::new("rustfft", size), &size, |b, _| {
            b.iter(|| {
                let mut buffer = reference.clone();
                plan.process(black_box(&mut buffer));
                buffer
            })
        });
    }

    group.finish();
}

fn bench_fft2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft2d");

    for size in [16usize, 64, 256, 512] {
        let input = random_matrix_f64(size, size, 7);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("forward", size), &size, |b, _| {
            b.iter(|| fft2d(black_box(input.view())))
        });

        let Ok(freq) = fft2d(input.view()) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("inverse", size), &size, |b, _| {
            b.iter(|| ifft2d(black_box(&freq)))
        });
    }

    group.finish();
}

// =============================================================================
// Frequency-Domain Benchmarks
// =============================================================================

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    let size = 256;
    let Ok(spectrum) = fft2d(random_matrix_f64(size, size, 11).view()) else {
        return;
    };
    group.throughput(Throughput::Elements((size * size) as u64));

    for (name, kind, param) in [
        ("ideal_low", FilterKind::IdealLowPass, 30.0),
        ("ideal_high", FilterKind::IdealHighPass, 30.0),
        ("gaussian_low", FilterKind::GaussianLowPass, 30.0),
        ("gaussian_high", FilterKind::GaussianHighPass, 30.0),
    ] {
        let Ok(filter) = FrequencyFilter::new(kind, param) else {
            continue;
        };
        group.bench_function(name, |b| b.iter(|| filter.apply(black_box(spectrum.view()))));
    }

    group.finish();
}

fn bench_codec_and_denoise(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let size = 256;
    let Ok(spectrum) = fft2d(random_matrix_f64(size, size, 13).view()) else {
        return;
    };
    let image = encode(spectrum.view());
    group.throughput(Throughput::Elements((size * size) as u64));

    group.bench_function("encode", |b| b.iter(|| encode(black_box(spectrum.view()))));
    group.bench_function("decode", |b| {
        b.iter(|| decode(black_box(image.view()), spectrum.view(), 10.0))
    });
    group.bench_function("denoise_image", |b| {
        b.iter(|| denoise_spectrum_image(black_box(image.view()), 0.1))
    });

    let gray = random_matrix_f64(200, 300, 17).mapv(|v| v * 255.0);
    let config = SpectralConfig::new();
    group.bench_function("remove_periodic_noise_200x300", |b| {
        b.iter(|| remove_periodic_noise(black_box(gray.view()), &config))
    });

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_fft1d,
    bench_fft2d,
    bench_filters,
    bench_codec_and_denoise,
);

criterion_main!(benches);
