//! Benchmarks for the Schroeder reverberator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unitgen::dsp::Reverb;
use unitgen::Block;

use crate::{params, BLOCK_SIZES};

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        let p = params(size);
        let input = Block::filled(&p, 0.1);

        let mut reverb = Reverb::new(&p, 3.0);
        group.bench_with_input(BenchmarkId::new("schroeder", size), &size, |b, _| {
            b.iter(|| {
                black_box(reverb.process(black_box(&input)));
            })
        });
    }

    group.finish();
}
