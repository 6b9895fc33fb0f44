use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::block::{Block, Control};
use crate::AudioParams;

const DEFAULT_SEED: u64 = 0x5eed_0f_a0d10;

/// Uniform white noise in `[-amplitude, amplitude]`.
///
/// Seeded, so two generators built with the same seed produce the same
/// stream.
pub struct WhiteNoise {
    amplitude: f64,
    rng: SmallRng,
    out: Block,
}

impl WhiteNoise {
    pub fn new(params: &AudioParams, amplitude: f64) -> Self {
        Self::with_seed(params, amplitude, DEFAULT_SEED)
    }

    pub fn with_seed(params: &AudioParams, amplitude: f64, seed: u64) -> Self {
        Self {
            amplitude,
            rng: SmallRng::seed_from_u64(seed),
            out: Block::new(params),
        }
    }

    pub fn process(&mut self) -> &Block {
        let amp = self.amplitude;
        self.process_with(amp)
    }

    pub fn process_with<'a>(&mut self, amplitude: impl Into<Control<'a>>) -> &Block {
        let amplitude = amplitude.into();
        for i in 0..self.out.len() {
            self.amplitude = amplitude.at(i);
            self.out[i] = self.amplitude * self.rng.random_range(-1.0..=1.0);
        }
        &self.out
    }

    pub fn output(&self) -> &Block {
        &self.out
    }
}
