use std::f64::consts::{PI, SQRT_2, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::{Block, Control};
use crate::AudioParams;

/*
| type          | constructed by  | order | passes          | rejects        |
| ------------- | --------------- | ----- | --------------- | -------------- |
| tone low-pass | tone_lp         | 1     | below cutoff    | above cutoff   |
| tone hi-pass  | tone_hp         | 1     | above cutoff    | below cutoff   |
| low-pass      | butter_lp       | 2     | below cutoff    | above cutoff   |
| high-pass     | butter_hp       | 2     | above cutoff    | below cutoff   |
| band-pass     | butter_bp       | 2     | cutoff ± bw/2   | outside        |
| band-reject   | butter_br       | 2     | outside         | cutoff ± bw/2  |

One-pole:   y[n] = a·x[n] − b·y[n−1]
Biquad:     w[n] = x[n] − b0·w[n−1] − b1·w[n−2]
            y[n] = a0·w[n] + a1·w[n−1] + a2·w[n−2]

Coefficients depend only on (cutoff, bandwidth, sample rate). A filter keeps
the values it last designed for and only redesigns when a fixed parameter
changes between calls; modulated parameters redesign on every sample.
Keep cutoff below Nyquist and bandwidth positive; neither is checked here.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneKind {
    LowPass,
    HighPass,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButterKind {
    LowPass,
    HighPass,
    BandPass,
    BandReject,
}

/// Feed-forward (`a`) and feedback (`b`) gains. One-pole filters use only
/// `a[0]` and `b[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coefficients {
    pub a: [f64; 3],
    pub b: [f64; 2],
}

/// A recursive filter core: a coefficient design plus a per-sample recurrence.
pub trait Recursive {
    /// Redesign for new parameters. `bandwidth` is ignored by kinds that
    /// don't use it.
    fn update(&mut self, cutoff: f64, bandwidth: f64, sample_rate: f64);

    /// Run one sample through the recurrence.
    fn tick(&mut self, x: f64) -> f64;

    /// Zero the delay registers.
    fn clear(&mut self);

    fn coefficients(&self) -> Coefficients;
}

/// First-order recursive core.
#[derive(Debug, Clone)]
pub struct OnePole {
    kind: ToneKind,
    a: f64,
    b: f64,
    y1: f64,
}

impl OnePole {
    pub fn new(kind: ToneKind) -> Self {
        Self {
            kind,
            a: 1.0,
            b: 0.0,
            y1: 0.0,
        }
    }
}

impl Recursive for OnePole {
    fn update(&mut self, cutoff: f64, _bandwidth: f64, sample_rate: f64) {
        let w = (TAU * cutoff / sample_rate).cos();
        match self.kind {
            ToneKind::LowPass => {
                let rc = 2.0 - w;
                self.b = (rc * rc - 1.0).sqrt() - rc;
                // unity gain at DC
                self.a = 1.0 + self.b;
            }
            ToneKind::HighPass => {
                let rc = 2.0 + w;
                self.b = rc - (rc * rc - 1.0).sqrt();
                // unity gain at Nyquist
                self.a = 1.0 - self.b;
            }
        }
    }

    #[inline]
    fn tick(&mut self, x: f64) -> f64 {
        self.y1 = self.a * x - self.b * self.y1;
        self.y1
    }

    fn clear(&mut self) {
        self.y1 = 0.0;
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients {
            a: [self.a, 0.0, 0.0],
            b: [self.b, 0.0],
        }
    }
}

/// Second-order Butterworth core (bilinear transform, direct form II).
#[derive(Debug, Clone)]
pub struct Biquad {
    kind: ButterKind,
    coeffs: Coefficients,
    w1: f64,
    w2: f64,
}

impl Biquad {
    pub fn new(kind: ButterKind) -> Self {
        Self {
            kind,
            coeffs: Coefficients {
                a: [1.0, 0.0, 0.0],
                b: [0.0, 0.0],
            },
            w1: 0.0,
            w2: 0.0,
        }
    }
}

impl Recursive for Biquad {
    fn update(&mut self, cutoff: f64, bandwidth: f64, sample_rate: f64) {
        let c = &mut self.coeffs;
        match self.kind {
            ButterKind::LowPass => {
                let l = 1.0 / (PI * cutoff / sample_rate).tan();
                c.a[0] = 1.0 / (1.0 + SQRT_2 * l + l * l);
                c.a[1] = 2.0 * c.a[0];
                c.a[2] = c.a[0];
                c.b[0] = 2.0 * (1.0 - l * l) * c.a[0];
                c.b[1] = (1.0 - SQRT_2 * l + l * l) * c.a[0];
            }
            ButterKind::HighPass => {
                let l = (PI * cutoff / sample_rate).tan();
                c.a[0] = 1.0 / (1.0 + SQRT_2 * l + l * l);
                c.a[1] = -2.0 * c.a[0];
                c.a[2] = c.a[0];
                c.b[0] = 2.0 * (l * l - 1.0) * c.a[0];
                c.b[1] = (1.0 - SQRT_2 * l + l * l) * c.a[0];
            }
            ButterKind::BandPass => {
                let m = 1.0 / (PI * bandwidth / sample_rate).tan();
                let d = 2.0 * (TAU * cutoff / sample_rate).cos();
                c.a[0] = 1.0 / (1.0 + m);
                c.a[1] = 0.0;
                c.a[2] = -c.a[0];
                c.b[0] = -m * d * c.a[0];
                c.b[1] = (m - 1.0) * c.a[0];
            }
            ButterKind::BandReject => {
                let m = (PI * bandwidth / sample_rate).tan();
                let d = 2.0 * (TAU * cutoff / sample_rate).cos();
                c.a[0] = 1.0 / (1.0 + m);
                c.a[1] = -d * c.a[0];
                c.a[2] = c.a[0];
                c.b[0] = c.a[1];
                c.b[1] = (1.0 - m) * c.a[0];
            }
        }
    }

    #[inline]
    fn tick(&mut self, x: f64) -> f64 {
        let Coefficients { a, b } = self.coeffs;
        let w = x - b[0] * self.w1 - b[1] * self.w2;
        let y = a[0] * w + a[1] * self.w1 + a[2] * self.w2;
        self.w2 = self.w1;
        self.w1 = w;
        y
    }

    fn clear(&mut self) {
        self.w1 = 0.0;
        self.w2 = 0.0;
    }

    fn coefficients(&self) -> Coefficients {
        self.coeffs
    }
}

/// Block-level filter around a [`Recursive`] core.
pub struct Filter<R> {
    core: R,
    cutoff: f64,
    bandwidth: f64,
    // Parameters the current coefficients were designed for.
    designed: Option<(f64, f64)>,
    updates: u64,
    sample_rate: f64,
    out: Block,
}

/// One-pole low/high-pass.
pub type ToneFilter = Filter<OnePole>;
/// Second-order Butterworth family.
pub type Butterworth = Filter<Biquad>;

impl<R: Recursive> Filter<R> {
    pub fn with_core(params: &AudioParams, core: R, cutoff: f64, bandwidth: f64) -> Self {
        let mut filter = Self {
            core,
            cutoff,
            bandwidth,
            designed: None,
            updates: 0,
            sample_rate: params.sr(),
            out: Block::new(params),
        };
        filter.redesign(cutoff, bandwidth);
        debug!(cutoff, bandwidth, coefficients = ?filter.core.coefficients(), "filter designed");
        filter
    }

    /// Filter one block at `cutoff`, fixed or per-sample.
    pub fn process<'a>(&mut self, signal: &Block, cutoff: impl Into<Control<'a>>) -> &Block {
        let bandwidth = self.bandwidth;
        self.run(signal, cutoff.into(), Control::Fixed(bandwidth))
    }

    fn run(&mut self, signal: &Block, cutoff: Control<'_>, bandwidth: Control<'_>) -> &Block {
        let modulated = cutoff.is_modulated() || bandwidth.is_modulated();
        if !modulated {
            self.redesign(cutoff.at(0), bandwidth.at(0));
        }

        for (i, &x) in signal.iter().enumerate().take(self.out.len()) {
            if modulated {
                self.cutoff = cutoff.at(i);
                self.bandwidth = bandwidth.at(i);
                self.core.update(self.cutoff, self.bandwidth, self.sample_rate);
                self.updates += 1;
                self.designed = Some((self.cutoff, self.bandwidth));
            }
            self.out[i] = self.core.tick(x);
        }

        &self.out
    }

    /// Redesign only if the parameters moved.
    fn redesign(&mut self, cutoff: f64, bandwidth: f64) {
        if self.designed == Some((cutoff, bandwidth)) {
            return;
        }
        self.cutoff = cutoff;
        self.bandwidth = bandwidth;
        self.core.update(cutoff, bandwidth, self.sample_rate);
        self.updates += 1;
        self.designed = Some((cutoff, bandwidth));
    }

    /// Zero the delay registers, keeping the coefficients.
    pub fn reset(&mut self) {
        self.core.clear();
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn coefficients(&self) -> Coefficients {
        self.core.coefficients()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// How many times the coefficients have been designed.
    pub fn coefficient_updates(&self) -> u64 {
        self.updates
    }

    pub fn output(&self) -> &Block {
        &self.out
    }
}

impl Filter<OnePole> {
    pub fn tone_lp(params: &AudioParams, cutoff: f64) -> Self {
        Self::with_core(params, OnePole::new(ToneKind::LowPass), cutoff, 0.0)
    }

    pub fn tone_hp(params: &AudioParams, cutoff: f64) -> Self {
        Self::with_core(params, OnePole::new(ToneKind::HighPass), cutoff, 0.0)
    }
}

impl Filter<Biquad> {
    pub fn butter_lp(params: &AudioParams, cutoff: f64) -> Self {
        Self::with_core(params, Biquad::new(ButterKind::LowPass), cutoff, 0.0)
    }

    pub fn butter_hp(params: &AudioParams, cutoff: f64) -> Self {
        Self::with_core(params, Biquad::new(ButterKind::HighPass), cutoff, 0.0)
    }

    pub fn butter_bp(params: &AudioParams, center: f64, bandwidth: f64) -> Self {
        Self::with_core(params, Biquad::new(ButterKind::BandPass), center, bandwidth)
    }

    pub fn butter_br(params: &AudioParams, center: f64, bandwidth: f64) -> Self {
        Self::with_core(params, Biquad::new(ButterKind::BandReject), center, bandwidth)
    }

    /// Filter with both center frequency and bandwidth, each fixed or per-sample.
    pub fn process_band<'a>(
        &mut self,
        signal: &Block,
        cutoff: impl Into<Control<'a>>,
        bandwidth: impl Into<Control<'a>>,
    ) -> &Block {
        self.run(signal, cutoff.into(), bandwidth.into())
    }
}
