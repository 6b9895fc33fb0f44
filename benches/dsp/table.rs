//! Benchmarks for additive table construction.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unitgen::dsp::{FuncTable, Waveform};

pub fn bench_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/table");

    for harmonics in [1usize, 10, 50] {
        group.bench_with_input(BenchmarkId::new("sawtooth_4096", harmonics), &harmonics, |b, &h| {
            b.iter(|| FuncTable::waveform(black_box(h), Waveform::Sawtooth, 0.0, 4096))
        });
    }

    group.finish();
}
