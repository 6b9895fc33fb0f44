//! Benchmarks for fractional delay lines.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use unitgen::dsp::{Allpass, Delay, TimeUnit};
use unitgen::Block;

use crate::{params, BLOCK_SIZES};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let p = params(size);
        let input = Block::filled(&p, 0.25);

        let mut delay = Delay::new(&p, 500.0, 0.4, TimeUnit::Millis);
        delay.set_delay_time(333.3);
        group.bench_with_input(BenchmarkId::new("comb", size), &size, |b, _| {
            b.iter(|| {
                black_box(delay.process(black_box(&input)));
            })
        });

        // Chorus-style moving read head
        let times = Block::from_vec(&p, (0..size).map(|i| 10.0 + (i % 16) as f64 * 0.1).collect())
            .expect("block sized input");
        let mut delay = Delay::new(&p, 50.0, 0.0, TimeUnit::Millis);
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                black_box(delay.process_time(black_box(&input), &times));
            })
        });

        let mut allpass = Allpass::new(&p, 5.0, 0.7, TimeUnit::Millis);
        group.bench_with_input(BenchmarkId::new("allpass", size), &size, |b, _| {
            b.iter(|| {
                black_box(allpass.process(black_box(&input)));
            })
        });
    }

    group.finish();
}
