//! Reverb - Room Simulation via Delay Networks
//!
//! A space is imitated by many delayed, decaying copies of the input. This is
//! the classic Schroeder layout: four feedback delays in parallel build up a
//! dense tail, two allpass stages in series smear it without coloring it.
//!
//! ```text
//! Input ──┬──→ [Comb 29.7ms] ──┐
//!         ├──→ [Comb 37.1ms] ──┤
//!         ├──→ [Comb 41.1ms] ──┼──→ (+) ──→ [Allpass 5.0ms] ──→ [Allpass 1.7ms] ──→ Output
//!         └──→ [Comb 43.7ms] ──┘
//! ```
//!
//! ## Combs
//!
//! ```text
//! y[n] = x[n − D] + g·y[n − D]
//! ```
//!
//! Each comb gets its own `g` so that every loop falls by 60 dB in the same
//! decay time: `g = 0.001^(D / sr / decay)`. Delay lengths share no common
//! factor, so the resonant peaks of the four combs don't line up.
//!
//! ## Allpasses
//!
//! ```text
//! y[n] = −g·x[n] + x[n − D] + g·y[n − D]
//! ```
//!
//! Their decay times are fixed (96.8 ms and 32.9 ms); only the comb decay
//! follows the reverb time.

use tracing::debug;

use crate::block::Block;
use crate::dsp::delay::{Allpass, Delay, TimeUnit};
use crate::AudioParams;

const COMB_DELAYS_MS: [f64; 4] = [29.7, 37.1, 41.1, 43.7];
const ALLPASS_DELAYS_MS: [f64; 2] = [5.0, 1.7];
const ALLPASS_DECAYS: [f64; 2] = [0.0968, 0.0329];

/// Default reverb time in seconds.
pub const DEFAULT_DECAY: f64 = 3.0;

/// Schroeder reverberator over blocks.
pub struct Reverb {
    combs: [Delay; 4],
    allpasses: [Allpass; 2],
    decay: f64,
    sum: Block,
}

impl Reverb {
    /// A reverb whose tail falls by 60 dB over `decay` seconds.
    pub fn new(params: &AudioParams, decay: f64) -> Self {
        let combs = COMB_DELAYS_MS.map(|ms| Delay::new(params, ms, 0.0, TimeUnit::Millis));
        let mut allpasses =
            ALLPASS_DELAYS_MS.map(|ms| Allpass::new(params, ms, 0.0, TimeUnit::Millis));
        for (allpass, decay) in allpasses.iter_mut().zip(ALLPASS_DECAYS) {
            let g = allpass.feedback_from_decay(decay);
            allpass.set_feedback(g);
        }

        let mut reverb = Self {
            combs,
            allpasses,
            decay,
            sum: Block::new(params),
        };
        reverb.set_decay_time(decay);
        reverb
    }

    /// Retune the comb feedback for a new reverb time. The tail already in
    /// the lines keeps ringing.
    pub fn set_decay_time(&mut self, decay: f64) {
        self.decay = decay;
        for comb in &mut self.combs {
            let g = comb.feedback_from_decay(decay);
            comb.set_feedback(g);
        }
        debug!(
            decay,
            feedback = ?self.combs.iter().map(Delay::feedback).collect::<Vec<_>>(),
            "reverb tuned"
        );
    }

    pub fn decay_time(&self) -> f64 {
        self.decay
    }

    /// Reverberate one block.
    pub fn process(&mut self, signal: &Block) -> &Block {
        self.sum.fill(0.0);
        for comb in &mut self.combs {
            let wet = comb.process(signal);
            for (acc, &y) in self.sum.as_mut_slice().iter_mut().zip(wet.iter()) {
                *acc += y;
            }
        }

        let [first, second] = &mut self.allpasses;
        let diffused = first.process(&self.sum);
        second.process(diffused)
    }

    /// The last block produced.
    pub fn output(&self) -> &Block {
        self.allpasses[1].output()
    }

    /// Silence every line.
    pub fn clear(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
    }
}
