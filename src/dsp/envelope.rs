#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::Block;
use crate::{AudioParams, Error, Result, EXP_FLOOR};

/*
Segment Envelope Generators
===========================

An envelope is a control curve drawn through a list of breakpoints:

    value
      p1 ┐      ╱╲
         │     ╱  ╲
      p2 ┤    ╱    ╲______
         │   ╱            ╲
      p0 └──╱──────────────╲──→ time
            t0   t1    t2    t3

`n` breakpoints and `n - 1` durations. Single-segment envelopes (`lineseg`,
`expseg`) are just the two-point case.

Vocabulary
----------

  elapsed     Samples produced since the last (re)trigger. Never reset when
              moving from one segment to the next, so segment boundaries are
              cumulative sample counts.

  increment   Per-sample step of the active segment.

  hold        After the last breakpoint, stay on it.

  repeat      After the last breakpoint, start over from the first. Takes
              priority over hold.

With neither flag, the curve keeps going past the last breakpoint with the
final segment's slope (or ratio).


Linear vs Exponential
---------------------

Linear segments add a constant each sample:

    increment = (end - start) / duration
    value    += increment

Exponential segments multiply by a constant ratio:

    increment = (end / start) ^ (1 / duration)
    value    *= increment

An exponential curve can never reach or leave exactly zero, so zero
breakpoints are replaced with 0.001 when the envelope is built. Breakpoints of
opposite sign have no real ratio; keep exponential curves on one side of zero.


The State Machine
-----------------

    ┌────────┐ last breakpoint ┌──────┐
    │ Active │ ──────────────→ │ Held │   (hold)
    └────────┘                 └──────┘
        │  ↑
        │  └── retrigger ←── (repeat)
        │
        └──────────────────→ ┌──────┐
                             │ Free │     (neither: keep extrapolating)
                             └──────┘

Durations are rounded to whole samples. Negative durations count as zero, and
a zero-length segment is an immediate jump to its end value.
*/

/// Shape of every segment in an envelope.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Active, // Moving through the breakpoints
    Held,   // Parked on the last breakpoint
    Free,   // Past the last breakpoint, still ramping
}

pub struct Envelope {
    // Shape (replaced wholesale by the reset_* methods)
    curve: Curve,
    points: Vec<f64>,
    durations: Vec<u64>, // per-segment lengths in samples
    hold: bool,
    repeat: bool,

    // Runtime state
    segment: usize,   // index of the active segment
    segment_end: u64, // cumulative sample count where it ends
    elapsed: u64,
    value: f64,
    increment: f64,
    stage: EnvelopeStage,

    sample_rate: f64,
    out: Block,
}

impl Envelope {
    /// Straight line from `start` to `end` over `duration` seconds.
    pub fn lineseg(
        params: &AudioParams,
        start: f64,
        duration: f64,
        end: f64,
        hold: bool,
        repeat: bool,
    ) -> Self {
        Self::build(params, Curve::Linear, vec![start, end], &[duration], hold, repeat)
    }

    /// Exponential curve from `start` to `end` over `duration` seconds.
    pub fn expseg(
        params: &AudioParams,
        start: f64,
        duration: f64,
        end: f64,
        hold: bool,
        repeat: bool,
    ) -> Self {
        Self::build(params, Curve::Exponential, vec![start, end], &[duration], hold, repeat)
    }

    /// Linear segments through `points`, `times[i]` seconds between
    /// `points[i]` and `points[i + 1]`.
    pub fn linesegs(
        params: &AudioParams,
        points: &[f64],
        times: &[f64],
        hold: bool,
        repeat: bool,
    ) -> Result<Self> {
        check_breakpoints(points, times)?;
        Ok(Self::build(params, Curve::Linear, points.to_vec(), times, hold, repeat))
    }

    /// Exponential segments through `points`.
    pub fn expsegs(
        params: &AudioParams,
        points: &[f64],
        times: &[f64],
        hold: bool,
        repeat: bool,
    ) -> Result<Self> {
        check_breakpoints(points, times)?;
        Ok(Self::build(params, Curve::Exponential, points.to_vec(), times, hold, repeat))
    }

    fn build(
        params: &AudioParams,
        curve: Curve,
        points: Vec<f64>,
        times: &[f64],
        hold: bool,
        repeat: bool,
    ) -> Self {
        let mut env = Self {
            curve,
            points: Vec::new(),
            durations: Vec::new(),
            hold,
            repeat,
            segment: 0,
            segment_end: 0,
            elapsed: 0,
            value: 0.0,
            increment: 0.0,
            stage: EnvelopeStage::Active,
            sample_rate: params.sr(),
            out: Block::new(params),
        };
        env.load(points, times);
        env.retrigger();
        env
    }

    fn load(&mut self, mut points: Vec<f64>, times: &[f64]) {
        if self.curve == Curve::Exponential {
            for p in &mut points {
                if *p == 0.0 {
                    *p = EXP_FLOOR;
                }
            }
        }
        self.durations = times
            .iter()
            .map(|&t| (t.max(0.0) * self.sample_rate).round() as u64)
            .collect();
        self.points = points;

        debug!(
            curve = ?self.curve,
            segments = self.durations.len(),
            total_samples = self.durations.iter().sum::<u64>(),
            "envelope loaded"
        );
    }

    fn segment_count(&self) -> usize {
        self.durations.len()
    }

    fn segment_increment(&self, segment: usize) -> f64 {
        let start = self.points[segment];
        let end = self.points[segment + 1];
        let duration = self.durations[segment];

        match (self.curve, duration) {
            (Curve::Linear, 0) => 0.0,
            (Curve::Exponential, 0) => 1.0,
            (Curve::Linear, n) => (end - start) / n as f64,
            (Curve::Exponential, n) => (end / start).powf(1.0 / n as f64),
        }
    }

    fn enter_segment(&mut self, segment: usize) {
        self.segment = segment;
        self.value = self.points[segment];
        self.segment_end += self.durations[segment];
        self.increment = self.segment_increment(segment);
    }

    #[inline]
    fn step(&mut self) {
        match self.curve {
            Curve::Linear => self.value += self.increment,
            Curve::Exponential => self.value *= self.increment,
        }
    }

    /// Restart from the first breakpoint.
    fn retrigger(&mut self) {
        self.elapsed = 0;
        self.segment_end = 0;
        self.enter_segment(0);

        // zero-length leading segments jump straight through
        while self.segment_end == 0 && self.segment + 1 < self.segment_count() {
            self.enter_segment(self.segment + 1);
        }
        if self.segment_end == 0 {
            self.value = self.points[self.segment + 1];
        }

        self.stage = EnvelopeStage::Active;
    }

    /// Produce one sample and advance the curve.
    pub fn generate(&mut self) -> f64 {
        let out = self.value;
        self.elapsed += 1;

        // Cross into the next segment(s) without resetting elapsed time.
        while self.elapsed > self.segment_end && self.segment + 1 < self.segment_count() {
            self.enter_segment(self.segment + 1);
        }

        if self.elapsed <= self.segment_end {
            if self.elapsed == self.segment_end {
                // land exactly on the breakpoint
                self.value = self.points[self.segment + 1];
            } else {
                self.step();
            }
            self.stage = EnvelopeStage::Active;
        } else if self.repeat {
            self.retrigger();
        } else if self.hold {
            self.value = self.points[self.segment + 1];
            self.stage = EnvelopeStage::Held;
        } else {
            self.step();
            self.stage = EnvelopeStage::Free;
        }

        out
    }

    /// Render one block of envelope values.
    pub fn process(&mut self) -> &Block {
        for i in 0..self.out.len() {
            self.out[i] = self.generate();
        }
        &self.out
    }

    /// Retrigger with the current breakpoints.
    pub fn reset(&mut self) {
        self.retrigger();
    }

    /// Replace the shape with a single segment and retrigger.
    pub fn reset_segment(&mut self, start: f64, duration: f64, end: f64, hold: bool, repeat: bool) {
        self.hold = hold;
        self.repeat = repeat;
        self.load(vec![start, end], &[duration]);
        self.retrigger();
    }

    /// Replace the breakpoints and retrigger. On error the envelope is left
    /// untouched.
    pub fn reset_segments(
        &mut self,
        points: &[f64],
        times: &[f64],
        hold: bool,
        repeat: bool,
    ) -> Result<()> {
        check_breakpoints(points, times)?;
        self.hold = hold;
        self.repeat = repeat;
        self.load(points.to_vec(), times);
        self.retrigger();
        Ok(())
    }

    /// The value the next call to [`generate`](Self::generate) will return.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Samples produced since the last trigger.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Total length of all segments, in samples.
    pub fn duration_samples(&self) -> u64 {
        self.durations.iter().sum()
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// True once a held envelope has parked on its last breakpoint.
    pub fn is_finished(&self) -> bool {
        self.stage == EnvelopeStage::Held
    }

    pub fn output(&self) -> &Block {
        &self.out
    }
}

fn check_breakpoints(points: &[f64], times: &[f64]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::invalid("an envelope needs at least two breakpoints"));
    }
    if times.len() != points.len() - 1 {
        return Err(Error::invalid(format!(
            "{} breakpoints need {} durations, got {}",
            points.len(),
            points.len() - 1,
            times.len()
        )));
    }
    Ok(())
}
