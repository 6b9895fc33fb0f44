use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::block::{Block, Control};
use crate::dsp::table::FuncTable;
use crate::AudioParams;

/*
Table-Lookup Oscillator
=======================

The oscillator walks a read position (`phase`) through one period of a
function table. Each sample it reads the table at `phase`, scales by the
amplitude, then advances:

    phase += size * frequency / sample_rate

and wraps back into [0, size). Negative frequencies walk backwards through
the table and wrap the other way; a frequency of zero parks the phase.

Reading Between Samples
-----------------------

`phase` is fractional, so the value we want usually sits between two table
entries:

    Truncate   table[floor(phase)]                  cheapest, noisiest
    Linear     a straight line between i and i+1    good default
    Cubic      4-point curve through i-1 .. i+2     smoothest

The table's two guard points mean i+1 and i+2 never need wrapping by hand.

Truncation error shrinks as the table grows: a 4096-point sine read with
truncation is already within a fraction of a percent of the ideal RMS.
*/

/// How an oscillator reads between table entries.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Truncate,
    #[default]
    Linear,
    Cubic,
}

/// Wrap `phase` into `[0, size)`.
#[inline]
pub(crate) fn wrap_phase(phase: f64, size: f64) -> f64 {
    if (0.0..size).contains(&phase) {
        return phase;
    }
    let wrapped = phase.rem_euclid(size);
    // rem_euclid can round up to `size` for tiny negative inputs
    if wrapped >= size {
        0.0
    } else {
        wrapped
    }
}

pub struct Oscillator {
    table: Arc<FuncTable>,
    amplitude: f64,
    frequency: f64,
    phase: f64,
    interpolation: Interpolation,
    sample_rate: f64,
    out: Block,
}

impl Oscillator {
    /// `phase` is the starting point as a fraction of one cycle.
    pub fn new(
        params: &AudioParams,
        amplitude: f64,
        frequency: f64,
        table: Arc<FuncTable>,
        phase: f64,
        interpolation: Interpolation,
    ) -> Self {
        let size = table.size() as f64;
        Self {
            table,
            amplitude,
            frequency,
            phase: wrap_phase(phase * size, size),
            interpolation,
            sample_rate: params.sr(),
            out: Block::new(params),
        }
    }

    /// Truncating oscillator.
    pub fn oscil(
        params: &AudioParams,
        amplitude: f64,
        frequency: f64,
        table: Arc<FuncTable>,
    ) -> Self {
        Self::new(params, amplitude, frequency, table, 0.0, Interpolation::Truncate)
    }

    /// Linearly interpolating oscillator.
    pub fn oscili(
        params: &AudioParams,
        amplitude: f64,
        frequency: f64,
        table: Arc<FuncTable>,
    ) -> Self {
        Self::new(params, amplitude, frequency, table, 0.0, Interpolation::Linear)
    }

    /// Cubic interpolating oscillator.
    pub fn oscilc(
        params: &AudioParams,
        amplitude: f64,
        frequency: f64,
        table: Arc<FuncTable>,
    ) -> Self {
        Self::new(params, amplitude, frequency, table, 0.0, Interpolation::Cubic)
    }

    /// Render one block at the current amplitude and frequency.
    pub fn process(&mut self) -> &Block {
        let (amp, freq) = (self.amplitude, self.frequency);
        self.process_with(amp, freq)
    }

    /// Render with a new amplitude, keeping the frequency.
    pub fn process_amp<'a>(&mut self, amplitude: impl Into<Control<'a>>) -> &Block {
        let freq = self.frequency;
        self.process_with(amplitude, freq)
    }

    /// Render with new amplitude and frequency, each fixed or per-sample.
    ///
    /// Modulated values are read at every sample index; afterwards the
    /// oscillator keeps the last value it saw.
    pub fn process_with<'a>(
        &mut self,
        amplitude: impl Into<Control<'a>>,
        frequency: impl Into<Control<'a>>,
    ) -> &Block {
        let amplitude = amplitude.into();
        let frequency = frequency.into();

        for i in 0..self.out.len() {
            self.amplitude = amplitude.at(i);
            self.frequency = frequency.at(i);
            self.out[i] = self.amplitude * self.read();
            self.update_phase();
        }

        &self.out
    }

    #[inline]
    fn read(&self) -> f64 {
        let table = self.table.values();
        let posi = self.phase as usize;
        let frac = self.phase - posi as f64;

        match self.interpolation {
            Interpolation::Truncate => table[posi],
            Interpolation::Linear => table[posi] + frac * (table[posi + 1] - table[posi]),
            Interpolation::Cubic => {
                let a = if posi == 0 {
                    table[self.table.size() - 1]
                } else {
                    table[posi - 1]
                };
                let b = table[posi];
                let c = table[posi + 1];
                let d = table[posi + 2];

                let tmp = d + 3.0 * b;
                let frac2 = frac * frac;
                let frac3 = frac * frac2;
                frac3 * (-a - 3.0 * c + tmp) / 6.0
                    + frac2 * ((a + c) / 2.0 - b)
                    + frac * (c + (-2.0 * a - tmp) / 6.0)
                    + b
            }
        }
    }

    #[inline]
    fn update_phase(&mut self) {
        let size = self.table.size() as f64;
        self.phase = wrap_phase(self.phase + size * self.frequency / self.sample_rate, size);
    }

    /// Current read position, in table samples.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = amplitude;
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    pub fn table(&self) -> &Arc<FuncTable> {
        &self.table
    }

    pub fn output(&self) -> &Block {
        &self.out
    }
}

/// A raw phase ramp in `[0, 1)`, for driving lookups downstream.
pub struct Phasor {
    frequency: f64,
    phase: f64,
    sample_rate: f64,
    out: Block,
}

impl Phasor {
    pub fn new(params: &AudioParams, frequency: f64, phase: f64) -> Self {
        Self {
            frequency,
            phase: wrap_phase(phase, 1.0),
            sample_rate: params.sr(),
            out: Block::new(params),
        }
    }

    pub fn process(&mut self) -> &Block {
        let freq = self.frequency;
        self.process_with(freq)
    }

    pub fn process_with<'a>(&mut self, frequency: impl Into<Control<'a>>) -> &Block {
        let frequency = frequency.into();
        for i in 0..self.out.len() {
            self.frequency = frequency.at(i);
            self.out[i] = self.phase;
            self.phase = wrap_phase(self.phase + self.frequency / self.sample_rate, 1.0);
        }
        &self.out
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn output(&self) -> &Block {
        &self.out
    }
}

/// Reads a table at externally supplied positions (e.g. a [`Phasor`]).
pub struct TableReader {
    table: Arc<FuncTable>,
    /// Positions are fractions of the table in `[0, 1)` rather than raw indices.
    normalized: bool,
    /// Out-of-range positions wrap around; otherwise they clamp to the ends.
    wrap: bool,
    out: Block,
}

impl TableReader {
    pub fn new(params: &AudioParams, table: Arc<FuncTable>, normalized: bool, wrap: bool) -> Self {
        Self {
            table,
            normalized,
            wrap,
            out: Block::new(params),
        }
    }

    /// Truncating lookup at each position of `positions`.
    pub fn read(&mut self, positions: &Block) -> &Block {
        let size = self.table.size();
        let values = self.table.values();

        for (i, &pos) in positions.iter().enumerate().take(self.out.len()) {
            let index = if self.normalized { pos * size as f64 } else { pos };
            let index = if self.wrap {
                wrap_phase(index, size as f64) as usize
            } else {
                index.clamp(0.0, (size - 1) as f64) as usize
            };
            self.out[i] = values[index];
        }

        &self.out
    }
}
