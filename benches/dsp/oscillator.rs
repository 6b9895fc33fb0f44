//! Benchmarks for table-lookup oscillators.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use unitgen::dsp::{FuncTable, Interpolation, Oscillator, Phasor, WhiteNoise};
use unitgen::Block;

use crate::{params, BLOCK_SIZES};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let table = Arc::new(FuncTable::sine(4096));

    for &size in BLOCK_SIZES {
        let p = params(size);

        for (name, interpolation) in [
            ("truncate", Interpolation::Truncate),
            ("linear", Interpolation::Linear),
            ("cubic", Interpolation::Cubic),
        ] {
            let mut osc = Oscillator::new(&p, 1.0, 440.0, table.clone(), 0.0, interpolation);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    black_box(osc.process());
                })
            });
        }

        // Audio-rate FM: frequency read per sample
        let mut osc = Oscillator::oscili(&p, 1.0, 440.0, table.clone());
        let fm = Block::from_vec(&p, (0..size).map(|i| 440.0 + (i % 32) as f64).collect())
            .expect("block sized input");
        group.bench_with_input(BenchmarkId::new("linear_fm", size), &size, |b, _| {
            b.iter(|| {
                black_box(osc.process_with(1.0, black_box(&fm)));
            })
        });

        let mut phasor = Phasor::new(&p, 440.0, 0.0);
        group.bench_with_input(BenchmarkId::new("phasor", size), &size, |b, _| {
            b.iter(|| {
                black_box(phasor.process());
            })
        });

        let mut noise = WhiteNoise::new(&p, 1.0);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| {
                black_box(noise.process());
            })
        });
    }

    group.finish();
}
