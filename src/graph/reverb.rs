use crate::block::Block;
use crate::dsp::reverb::Reverb;
use crate::graph::effect::{Effect, EffectNode};

/// Schroeder reverb as the tail end of a chain.
pub type ReverbNode = EffectNode<Reverb>;

impl Effect for Reverb {
    fn apply(&mut self, input: &Block) -> &Block {
        self.process(input)
    }
}
