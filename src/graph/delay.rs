use crate::block::Block;
use crate::dsp::delay::{Allpass, Delay};
use crate::graph::effect::{Effect, EffectNode};

/// Feedback delay at its current time and feedback.
pub type DelayNode = EffectNode<Delay>;
/// Allpass diffuser at its current time and feedback.
pub type AllpassNode = EffectNode<Allpass>;

impl Effect for Delay {
    fn apply(&mut self, input: &Block) -> &Block {
        self.process(input)
    }
}

impl Effect for Allpass {
    fn apply(&mut self, input: &Block) -> &Block {
        self.process(input)
    }
}
