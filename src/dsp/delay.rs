#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::{Block, Control};
use crate::AudioParams;

/// Unit in which delay times are given, both at construction and in later
/// calls (modulation blocks included).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    #[default]
    Seconds,
    Millis,
    Samples,
}

impl TimeUnit {
    pub fn to_samples(self, time: f64, sample_rate: f64) -> f64 {
        match self {
            TimeUnit::Seconds => time * sample_rate,
            TimeUnit::Millis => time * sample_rate / 1000.0,
            TimeUnit::Samples => time,
        }
    }
}

/// Feedback gain that brings a loop of `delay_secs` down by 60 dB after
/// `decay` seconds. A non-positive decay gives no feedback.
pub fn feedback_for(decay: f64, delay_secs: f64) -> f64 {
    if decay <= 0.0 {
        return 0.0;
    }
    0.001f64.powf(delay_secs / decay)
}

/// Circular buffer of `max + 1` slots, so that a read `max` samples back
/// never lands on the slot about to be written.
#[derive(Debug, Clone)]
struct Line {
    buffer: Vec<f64>,
    write_pos: usize,
}

impl Line {
    fn new(max_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_samples + 1],
            write_pos: 0,
        }
    }

    fn max(&self) -> f64 {
        (self.buffer.len() - 1) as f64
    }

    /// Sample written `k` ticks ago, for `1 <= k <= len`.
    #[inline]
    fn tap(&self, k: usize) -> f64 {
        let len = self.buffer.len();
        self.buffer[(self.write_pos + len - k) % len]
    }

    /// Linearly interpolated read `delay` samples back. A zero-sample delay
    /// reads `current`.
    #[inline]
    fn read(&self, delay: f64, current: f64) -> f64 {
        let whole = delay.floor();
        let frac = delay - whole;
        let k = whole as usize;
        let at = |k: usize| if k == 0 { current } else { self.tap(k) };

        let y0 = at(k);
        if frac == 0.0 {
            return y0;
        }
        y0 + frac * (at(k + 1) - y0)
    }

    #[inline]
    fn write(&mut self, value: f64) {
        self.buffer[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Everything [`Delay`] and [`Allpass`] share; only the per-sample
/// topology differs.
#[derive(Debug, Clone)]
struct DelayCore {
    line: Line,
    unit: TimeUnit,
    // samples, within [min_delay, max]
    delay: f64,
    min_delay: f64,
    feedback: f64,
    sample_rate: f64,
    out: Block,
}

impl DelayCore {
    fn new(
        params: &AudioParams,
        max_time: f64,
        feedback: f64,
        unit: TimeUnit,
        min_delay: f64,
    ) -> Self {
        let sample_rate = params.sr();
        let max_samples = unit.to_samples(max_time, sample_rate).max(min_delay) as usize;
        debug!(max_samples, feedback, ?unit, "delay line allocated");

        Self {
            line: Line::new(max_samples),
            unit,
            delay: max_samples as f64,
            min_delay,
            feedback,
            sample_rate,
            out: Block::new(params),
        }
    }

    fn to_delay(&self, time: f64) -> f64 {
        self.unit
            .to_samples(time, self.sample_rate)
            .clamp(self.min_delay, self.line.max().max(self.min_delay))
    }

    fn run(
        &mut self,
        signal: &Block,
        time: Option<Control<'_>>,
        feedback: Option<Control<'_>>,
        tick: impl Fn(&mut Line, f64, f64, f64) -> f64,
    ) -> &Block {
        let mut time_mod = None;
        match time {
            Some(Control::Fixed(t)) => self.delay = self.to_delay(t),
            Some(Control::Modulated(block)) => time_mod = Some(block),
            None => {}
        }
        let mut feedback_mod = None;
        match feedback {
            Some(Control::Fixed(fb)) => self.feedback = fb,
            Some(Control::Modulated(block)) => feedback_mod = Some(block),
            None => {}
        }

        for (i, &x) in signal.iter().enumerate().take(self.out.len()) {
            if let Some(block) = time_mod {
                self.delay = self.to_delay(Control::Modulated(block).at(i));
            }
            if let Some(block) = feedback_mod {
                self.feedback = Control::Modulated(block).at(i);
            }
            self.out[i] = tick(&mut self.line, self.delay, self.feedback, x);
        }

        &self.out
    }
}

/// Feedback delay line with a fractional read position.
///
/// ```text
/// y[n]      = line read `delay` samples back (linear interpolation)
/// line[n]   = x[n] + y[n]·feedback
/// ```
///
/// With feedback this is a comb filter, without it a plain delay. Times
/// are clamped to `[0, max]`.
#[derive(Debug, Clone)]
pub struct Delay {
    core: DelayCore,
}

#[inline]
fn comb_tick(line: &mut Line, delay: f64, feedback: f64, x: f64) -> f64 {
    let y = line.read(delay, x);
    line.write(x + y * feedback);
    y
}

impl Delay {
    /// A line holding up to `max_time` (in `unit`). The delay time starts
    /// at the maximum.
    pub fn new(params: &AudioParams, max_time: f64, feedback: f64, unit: TimeUnit) -> Self {
        Self {
            core: DelayCore::new(params, max_time, feedback, unit, 0.0),
        }
    }

    /// Delay at the current time and feedback.
    pub fn process(&mut self, signal: &Block) -> &Block {
        self.core.run(signal, None, None, comb_tick)
    }

    /// Delay with a new time, fixed or per-sample. Fixed values persist
    /// into later calls; a modulated time leaves its last value behind.
    pub fn process_time<'a>(&mut self, signal: &Block, time: impl Into<Control<'a>>) -> &Block {
        self.core.run(signal, Some(time.into()), None, comb_tick)
    }

    /// Delay with new time and feedback, each fixed or per-sample.
    pub fn process_with<'a>(
        &mut self,
        signal: &Block,
        time: impl Into<Control<'a>>,
        feedback: impl Into<Control<'a>>,
    ) -> &Block {
        self.core
            .run(signal, Some(time.into()), Some(feedback.into()), comb_tick)
    }

    /// Set the delay time in the line's unit, clamped to `[0, max]`.
    pub fn set_delay_time(&mut self, time: f64) {
        self.core.delay = self.core.to_delay(time);
    }

    pub fn set_feedback(&mut self, feedback: f64) {
        self.core.feedback = feedback;
    }

    /// Current delay in samples.
    pub fn delay_samples(&self) -> f64 {
        self.core.delay
    }

    pub fn max_samples(&self) -> f64 {
        self.core.line.max()
    }

    pub fn feedback(&self) -> f64 {
        self.core.feedback
    }

    /// Feedback for a 60 dB decay over `decay` seconds at the current delay.
    pub fn feedback_from_decay(&self, decay: f64) -> f64 {
        feedback_for(decay, self.core.delay / self.core.sample_rate)
    }

    /// Silence the line. Time and feedback are kept.
    pub fn clear(&mut self) {
        self.core.line.clear();
    }

    pub fn output(&self) -> &Block {
        &self.core.out
    }
}

/// Schroeder allpass: flat magnitude, frequency-dependent phase.
///
/// ```text
/// d        = line read `delay` samples back
/// node     = x[n] + d·g
/// y[n]     = d − node·g
/// line[n]  = node
/// ```
///
/// The delay is at least one sample, since the node feeds back into itself.
#[derive(Debug, Clone)]
pub struct Allpass {
    core: DelayCore,
}

#[inline]
fn allpass_tick(line: &mut Line, delay: f64, feedback: f64, x: f64) -> f64 {
    let delayed = line.read(delay, 0.0);
    let node = x + delayed * feedback;
    line.write(node);
    delayed - node * feedback
}

impl Allpass {
    pub fn new(params: &AudioParams, max_time: f64, feedback: f64, unit: TimeUnit) -> Self {
        Self {
            core: DelayCore::new(params, max_time, feedback, unit, 1.0),
        }
    }

    pub fn process(&mut self, signal: &Block) -> &Block {
        self.core.run(signal, None, None, allpass_tick)
    }

    pub fn process_time<'a>(&mut self, signal: &Block, time: impl Into<Control<'a>>) -> &Block {
        self.core.run(signal, Some(time.into()), None, allpass_tick)
    }

    pub fn process_with<'a>(
        &mut self,
        signal: &Block,
        time: impl Into<Control<'a>>,
        feedback: impl Into<Control<'a>>,
    ) -> &Block {
        self.core
            .run(signal, Some(time.into()), Some(feedback.into()), allpass_tick)
    }

    pub fn set_delay_time(&mut self, time: f64) {
        self.core.delay = self.core.to_delay(time);
    }

    pub fn set_feedback(&mut self, feedback: f64) {
        self.core.feedback = feedback;
    }

    pub fn delay_samples(&self) -> f64 {
        self.core.delay
    }

    pub fn feedback(&self) -> f64 {
        self.core.feedback
    }

    pub fn feedback_from_decay(&self, decay: f64) -> f64 {
        feedback_for(decay, self.core.delay / self.core.sample_rate)
    }

    pub fn clear(&mut self) {
        self.core.line.clear();
    }

    pub fn output(&self) -> &Block {
        &self.core.out
    }
}
