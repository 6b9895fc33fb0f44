//! Benchmarks for one-pole and Butterworth filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unitgen::dsp::{Butterworth, ToneFilter};
use unitgen::Block;

use crate::{params, BLOCK_SIZES};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let p = params(size);

        // Generate a test signal (sawtooth-like ramp)
        let ramp = (0..size).map(|i| (i as f64 / size as f64) * 2.0 - 1.0).collect();
        let input = Block::from_vec(&p, ramp).expect("block sized input");

        let mut filter = ToneFilter::tone_lp(&p, 1_000.0);
        group.bench_with_input(BenchmarkId::new("tone_lp", size), &size, |b, _| {
            b.iter(|| {
                black_box(filter.process(black_box(&input), 1_000.0));
            })
        });

        let mut filter = Butterworth::butter_lp(&p, 1_000.0);
        group.bench_with_input(BenchmarkId::new("butter_lp", size), &size, |b, _| {
            b.iter(|| {
                black_box(filter.process(black_box(&input), 1_000.0));
            })
        });

        let mut filter = Butterworth::butter_bp(&p, 1_000.0, 100.0);
        group.bench_with_input(BenchmarkId::new("butter_bp", size), &size, |b, _| {
            b.iter(|| {
                black_box(filter.process_band(black_box(&input), 1_000.0, 100.0));
            })
        });

        // Per-sample coefficient redesign
        let sweep = Block::from_vec(&p, (0..size).map(|i| 500.0 + i as f64).collect())
            .expect("block sized input");
        let mut filter = Butterworth::butter_lp(&p, 1_000.0);
        group.bench_with_input(BenchmarkId::new("butter_lp_swept", size), &size, |b, _| {
            b.iter(|| {
                black_box(filter.process(black_box(&input), &sweep));
            })
        });
    }

    group.finish();
}
