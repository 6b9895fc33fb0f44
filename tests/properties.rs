use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use unitgen::dsp::{
    Butterworth, Delay, Envelope, FuncTable, Interpolation, Oscillator, Reverb, SampleReader,
    SampleTable, TimeUnit, ToneFilter, Waveform, WhiteNoise,
};
use unitgen::graph::reverb::ReverbNode;
use unitgen::graph::{FilterNode, GraphNode, NodeExt};
use unitgen::io::{BlockWriter, WavSource, WavWriter};
use unitgen::{AudioParams, Block};

fn params(block_size: usize) -> AudioParams {
    AudioParams::new(44_100, 1, block_size).unwrap()
}

fn impulse(p: &AudioParams) -> Block {
    let mut block = Block::new(p);
    block[0] = 1.0;
    block
}

/// Run an envelope for `samples` samples, block by block.
fn render_envelope(env: &mut Envelope, samples: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(samples);
    while out.len() < samples {
        out.extend_from_slice(env.process().as_slice());
    }
    out.truncate(samples);
    out
}

#[test]
fn truncating_sine_has_ideal_rms_over_one_period() {
    // 441 Hz at 44.1 kHz: one period is exactly one 100-sample block
    let p = params(100);
    for (size, tolerance) in [(4096, 2e-3), (16, 5e-2)] {
        let table = Arc::new(FuncTable::sine(size));
        let mut osc = Oscillator::oscil(&p, 0.8, 441.0, table);
        let rms = osc.process().rms();
        let ideal = 0.8 / 2f64.sqrt();
        assert!((rms - ideal).abs() < tolerance, "size {size}: {rms} vs {ideal}");
    }
}

#[test]
fn phase_stays_inside_the_table() {
    let p = params(64);
    let table = Arc::new(FuncTable::sine(512));
    for frequency in [-1e6, -30_000.0, -441.0, 0.0, 0.1, 441.0, 30_000.0, 1e6] {
        for interpolation in [
            Interpolation::Truncate,
            Interpolation::Linear,
            Interpolation::Cubic,
        ] {
            let mut osc = Oscillator::new(&p, 1.0, frequency, table.clone(), 0.3, interpolation);
            for _ in 0..50 {
                let out = osc.process();
                assert!(out.iter().all(|x| x.is_finite()));
                let phase = osc.phase();
                assert!((0.0..512.0).contains(&phase), "{frequency} Hz: phase {phase}");
            }
        }
    }
}

#[test]
fn zero_frequency_parks_the_phase() {
    let p = params(64);
    let mut osc = Oscillator::oscili(&p, 1.0, 0.0, Arc::new(FuncTable::sine(4096)));
    let before = osc.phase();
    osc.process();
    assert_eq!(osc.phase(), before);
}

#[test]
fn tone_impulse_responses_decay_monotonically() {
    let p = params(512);
    for cutoff in [50.0, 1_000.0, 10_000.0, 20_000.0] {
        for mut filter in [ToneFilter::tone_lp(&p, cutoff), ToneFilter::tone_hp(&p, cutoff)] {
            let out = filter.process(&impulse(&p), cutoff);
            for (n, pair) in out.as_slice().windows(2).enumerate() {
                assert!(pair[1].abs() <= pair[0].abs(), "cutoff {cutoff}, sample {n}");
            }
        }
    }
}

#[test]
fn butterworth_responses_stay_bounded() {
    let p = params(256);
    let mut noise = WhiteNoise::with_seed(&p, 1.0, 42);
    let mut filters = [
        Butterworth::butter_lp(&p, 2_000.0),
        Butterworth::butter_hp(&p, 2_000.0),
        Butterworth::butter_bp(&p, 2_000.0, 200.0),
        Butterworth::butter_br(&p, 2_000.0, 200.0),
    ];
    for _ in 0..200 {
        let input = noise.process().clone();
        for filter in &mut filters {
            let out = filter.process(&input, 2_000.0);
            assert!(out.iter().all(|x| x.is_finite() && x.abs() < 10.0));
        }
    }
}

#[test]
fn lineseg_hits_every_point_on_the_line() {
    let p = params(64);
    let mut env = Envelope::lineseg(&p, 0.0, 1.0, 1.0, true, false);
    let values = render_envelope(&mut env, 44_100 + 1_000);

    for (t, &v) in values.iter().enumerate().take(44_101) {
        let expected = t as f64 / 44_100.0;
        assert!((v - expected).abs() < 1e-9, "t = {t}: {v} vs {expected}");
    }
    assert!(values[44_100..].iter().all(|&v| v == 1.0));
}

#[test]
fn expseg_doubles_over_two_seconds() {
    let p = params(64);
    let mut env = Envelope::expseg(&p, 1.0, 2.0, 2.0, true, false);
    let values = render_envelope(&mut env, 88_200 + 64);

    assert_eq!(values[0], 1.0);
    assert!((values[44_100] - 2f64.sqrt()).abs() < 1e-9);
    assert!((values[88_200] - 2.0).abs() < 1e-12);
    assert!(values[88_200..].iter().all(|&v| (v - 2.0).abs() < 1e-12));
}

#[test]
fn pure_delay_returns_the_impulse() {
    let p = params(256);

    let mut delay = Delay::new(&p, 200.0, 0.0, TimeUnit::Samples);
    let out = delay.process_time(&impulse(&p), 100.0);
    assert_eq!(out[100], 1.0);
    assert_eq!(out.iter().filter(|&&x| x != 0.0).count(), 1);

    let mut delay = Delay::new(&p, 200.0, 0.0, TimeUnit::Samples);
    let out = delay.process_time(&impulse(&p), 100.5);
    assert!((out[100] - 0.5).abs() < 1e-12);
    assert!((out[101] - 0.5).abs() < 1e-12);
}

#[test]
fn reverb_is_deterministic() {
    let p = params(128);
    let render = || {
        let mut noise = WhiteNoise::with_seed(&p, 0.5, 9);
        let mut reverb = Reverb::new(&p, 1.5);
        let mut blocks = Vec::new();
        for _ in 0..50 {
            let input = noise.process().clone();
            blocks.push(reverb.process(&input).clone());
        }
        blocks
    };
    assert_eq!(render(), render());
}

#[test]
fn single_harmonic_fourier_table_is_a_sine_table() {
    let fourier = FuncTable::waveform(1, Waveform::Sine, 0.0, 4096);
    let sine = FuncTable::sine(4096);
    for (a, b) in fourier.values().iter().zip(sine.values()) {
        assert!((a - b).abs() < 1e-12);
    }
}

/// Magnitude of harmonics 1..=n of one table period.
fn spectrum(table: &FuncTable, n: usize) -> Vec<f64> {
    let size = table.size();
    let mut buffer: Vec<Complex<f64>> =
        table.period().iter().map(|&x| Complex::new(x, 0.0)).collect();
    FftPlanner::new().plan_fft_forward(size).process(&mut buffer);
    (1..=n).map(|k| buffer[k].norm() * 2.0 / size as f64).collect()
}

#[test]
fn additive_tables_have_the_expected_harmonics() {
    let saw = spectrum(&FuncTable::waveform(8, Waveform::Sawtooth, 0.0, 1024), 12);
    for (k, &mag) in saw.iter().enumerate() {
        let expected = if k < 8 { 1.0 / (k + 1) as f64 } else { 0.0 };
        assert!((mag - expected).abs() < 1e-9, "saw harmonic {}: {mag}", k + 1);
    }

    let square = spectrum(&FuncTable::waveform(9, Waveform::Square, 0.0, 1024), 9);
    for (k, &mag) in square.iter().enumerate() {
        let harmonic = k + 1;
        let expected = if harmonic % 2 == 1 { 1.0 / harmonic as f64 } else { 0.0 };
        assert!((mag - expected).abs() < 1e-9, "square harmonic {harmonic}: {mag}");
    }

    let triangle = spectrum(&FuncTable::waveform(5, Waveform::Triangle, 0.0, 1024), 5);
    assert!((triangle[2] - 1.0 / 9.0).abs() < 1e-9);
    assert!(triangle[1].abs() < 1e-9);
}

#[test]
fn recorded_audio_plays_back_through_a_sample_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ramp.wav");
    let p = params(64);

    let ramp = Block::from_vec(&p, (0..64).map(|i| i as f64 / 128.0).collect()).unwrap();
    let mut writer = WavWriter::create(&path, &p).unwrap();
    writer.write(&ramp).unwrap();
    writer.finish().unwrap();

    let table = SampleTable::load(&WavSource, &path).unwrap();
    assert_eq!(table.frames(), 64);
    let mut reader = SampleReader::new(&p, Arc::new(table), 0.0, false).unwrap();

    let half = reader.process(0.5).clone();
    for i in 0..64 {
        let expected = i as f64 / 256.0;
        assert!((half[i] - expected).abs() < 1e-4, "{i}: {} vs {expected}", half[i]);
    }
}

#[test]
fn demo_patch_renders_a_decaying_tail() {
    let p = params(256);
    let saw = Arc::new(FuncTable::waveform(20, Waveform::Sawtooth, 0.0, 4096));
    let sweep = Envelope::linesegs(&p, &[0.0, 1.0, 0.1], &[0.02, 0.3], true, false).unwrap();
    let amp = Envelope::linesegs(&p, &[0.0, 1.0, 0.0], &[0.005, 0.2], true, false).unwrap();

    let mut patch = Oscillator::oscili(&p, 0.3, 110.0, saw)
        .through(FilterNode::new(Butterworth::butter_lp(&p, 200.0)).modulate_cutoff(sweep, 3_000.0))
        .amplify(amp)
        .through(ReverbNode::new(Reverb::new(&p, 0.5)));

    let mut block = Block::new(&p);
    let mut peaks = Vec::new();
    // 3 seconds
    for _ in 0..517 {
        patch.render_block(&mut block);
        assert!(block.iter().all(|x| x.is_finite()));
        peaks.push(block.peak());
    }

    let loud = peaks[..40].iter().cloned().fold(0.0, f64::max);
    let quiet = peaks[480..].iter().cloned().fold(0.0, f64::max);
    assert!(loud > 0.05, "{loud}");
    assert!(quiet < loud * 1e-3, "{quiet} vs {loud}");
}
