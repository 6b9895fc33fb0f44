//! Benchmarks for breakpoint envelopes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unitgen::dsp::Envelope;

use crate::{params, BLOCK_SIZES};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let p = params(size);

        // Long ramps so every iteration stays inside a segment
        let mut env = Envelope::lineseg(&p, 0.0, 3_600.0, 1.0, true, false);
        group.bench_with_input(BenchmarkId::new("lineseg", size), &size, |b, _| {
            b.iter(|| {
                black_box(env.process());
            })
        });

        let mut env = Envelope::expseg(&p, 1.0, 3_600.0, 0.001, true, false);
        group.bench_with_input(BenchmarkId::new("expseg", size), &size, |b, _| {
            b.iter(|| {
                black_box(env.process());
            })
        });

        // Short repeating segments: boundary crossings every few samples
        let points = [0.0, 1.0, 0.5, 0.0];
        let times = [0.0002; 3];
        let mut env =
            Envelope::linesegs(&p, &points, &times, false, true).expect("matching breakpoints");
        group.bench_with_input(BenchmarkId::new("linesegs_repeat", size), &size, |b, _| {
            b.iter(|| {
                black_box(env.process());
            })
        });
    }

    group.finish();
}
