use std::f64::consts::TAU;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::io::SampleSource;
use crate::{Error, Result};

/*
Function Tables
===============

A function table is one period of a waveform, sampled once up front so that
oscillators only ever do a lookup per sample.

Guard Points
------------

Every table stores `size + 2` values:

    index:  0   1   2  ...  size-1 | size   size+1
    value:  t0  t1  t2 ...  tN-1   | t0     t1
                                     └─ copies of the first two points

Linear interpolation reads `table[i]` and `table[i + 1]`; cubic interpolation
reads up to `table[i + 2]`. With the guard points in place neither needs to
wrap the index by hand, even at the very end of the period.

Additive Synthesis
------------------

Fourier tables sum sine partials:

    table[i] = Σ_k  amp[k] * sin((k + 1) * 2π * i / size + phase)

The classic shapes are just particular amplitude falloffs:

    shape       harmonics used    amplitude of harmonic n
    ---------   ---------------   -----------------------
    sine        1 only            1
    sawtooth    all               1 / n
    square      odd               1 / n
    triangle    odd               1 / n²

These are band-limited by construction: pick the harmonic count so the top
partial stays under Nyquist at the highest pitch you intend to play.
*/

/// Named additive waveform shapes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
    Triangle,
    Square,
    /// Every harmonic at full strength (a band-limited pulse train).
    Flat,
}

impl Waveform {
    /// Amplitude of each harmonic for this shape, fundamental first.
    pub fn partials(self, harmonics: usize) -> Vec<f64> {
        let mut amps = vec![0.0; harmonics];
        match self {
            Waveform::Sine => {
                if let Some(first) = amps.first_mut() {
                    *first = 1.0;
                }
            }
            Waveform::Sawtooth => {
                for (k, amp) in amps.iter_mut().enumerate() {
                    *amp = 1.0 / (k + 1) as f64;
                }
            }
            Waveform::Triangle => {
                for (k, amp) in amps.iter_mut().enumerate().step_by(2) {
                    let n = (k + 1) as f64;
                    *amp = 1.0 / (n * n);
                }
            }
            Waveform::Square => {
                for (k, amp) in amps.iter_mut().enumerate().step_by(2) {
                    *amp = 1.0 / (k + 1) as f64;
                }
            }
            Waveform::Flat => amps.fill(1.0),
        }
        amps
    }
}

/// An immutable, guard-padded lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncTable {
    values: Vec<f64>,
    size: usize,
    normalized: bool,
}

impl FuncTable {
    /// Build a table from raw samples (or silence), optionally normalized to
    /// a peak of 1.0.
    ///
    /// `samples` shorter than `size` are zero-padded; extra samples are
    /// ignored. A `size` of zero is bumped to one.
    pub fn new(size: usize, samples: Option<&[f64]>, normalize: bool) -> Self {
        let size = size.max(1);
        let mut values = vec![0.0; size + 2];
        if let Some(samples) = samples {
            let n = samples.len().min(size);
            values[..n].copy_from_slice(&samples[..n]);
        }

        let mut table = Self {
            values,
            size,
            normalized: false,
        };
        if normalize {
            table.normalize();
        }
        table.wrap_guards();
        table
    }

    pub fn zeroed(size: usize) -> Self {
        Self::new(size, None, false)
    }

    pub fn from_samples(samples: &[f64], normalize: bool) -> Self {
        Self::new(samples.len(), Some(samples), normalize)
    }

    /// One period of a unit sine.
    pub fn sine(size: usize) -> Self {
        let size = size.max(1);
        let samples: Vec<f64> = (0..size)
            .map(|i| (i as f64 * TAU / size as f64).sin())
            .collect();
        Self::new(size, Some(&samples), false)
    }

    /// Additive table from explicit partial amplitudes.
    ///
    /// With `amps = None` every partial has amplitude 1. Missing entries in a
    /// short `amps` slice count as zero.
    pub fn fourier(harmonics: usize, amps: Option<&[f64]>, phase: f64, size: usize) -> Self {
        let size = size.max(1);
        let mut samples = vec![0.0; size];

        for partial in 0..harmonics {
            let amp = match amps {
                Some(amps) => amps.get(partial).copied().unwrap_or(0.0),
                None => 1.0,
            };
            if amp == 0.0 {
                continue;
            }
            let step = (partial + 1) as f64 * TAU / size as f64;
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample += amp * (step * i as f64 + phase).sin();
            }
        }

        debug!(harmonics, size, "built fourier table");
        Self::new(size, Some(&samples), false)
    }

    /// Additive table for one of the named shapes.
    pub fn waveform(harmonics: usize, shape: Waveform, phase: f64, size: usize) -> Self {
        let amps = shape.partials(harmonics);
        Self::fourier(harmonics, Some(&amps), phase, size)
    }

    fn normalize(&mut self) {
        let peak = self.values[..self.size]
            .iter()
            .fold(0.0f64, |acc, &x| acc.max(x.abs()));
        if peak > 0.0 {
            for value in &mut self.values[..self.size] {
                *value /= peak;
            }
        }
        self.normalized = true;
    }

    fn wrap_guards(&mut self) {
        let size = self.size;
        self.values[size] = self.values[0];
        self.values[size + 1] = self.values[1 % size];
    }

    /// Number of samples in one period (guards excluded).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// All values including the two guard points.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// One period without the guard points.
    pub fn period(&self) -> &[f64] {
        &self.values[..self.size]
    }
}

/// Decoded audio held in memory for table-driven playback.
///
/// Samples stay interleaved; one trailing zero is appended so interpolated
/// reads at the last frame stay in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    samples: Vec<f64>,
    channels: u16,
    sample_rate: u32,
    frames: usize,
}

impl SampleTable {
    /// Load every frame from `source`. Fails if the source cannot be read.
    pub fn load(source: &dyn SampleSource, path: impl AsRef<Path>) -> Result<Self> {
        let data = source.read(path.as_ref())?;
        if data.channels == 0 {
            return Err(Error::invalid("sample source reported zero channels"));
        }

        let mut samples = data.samples;
        samples.truncate(data.frames * data.channels as usize);
        samples.push(0.0);

        debug!(frames = data.frames, channels = data.channels, "sample table loaded");

        Ok(Self {
            samples,
            channels: data.channels,
            sample_rate: data.sample_rate,
            frames: data.frames,
        })
    }

    /// Build a table directly from interleaved samples.
    pub fn from_interleaved(samples: Vec<f64>, channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(Error::invalid("sample table needs at least one channel"));
        }
        let frames = samples.len() / channels as usize;
        let mut samples = samples;
        samples.truncate(frames * channels as usize);
        samples.push(0.0);

        Ok(Self {
            samples,
            channels,
            sample_rate,
            frames,
        })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of stored samples, `frames * channels`, guard excluded.
    pub fn len(&self) -> usize {
        self.samples.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interleaved samples with the trailing guard.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}
