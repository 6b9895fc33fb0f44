use crate::block::Block;
use crate::graph::node::{scratch, GraphNode};

/// A block processor with an input: delays, reverbs, fixed filters.
pub trait Effect: Send {
    fn apply(&mut self, input: &Block) -> &Block;
}

/// Adapts an [`Effect`] into a node that rewrites the block it is handed,
/// so it can sit on the right-hand side of `.through()`.
pub struct EffectNode<E> {
    effect: E,
    input: Option<Block>,
}

impl<E: Effect> EffectNode<E> {
    pub fn new(effect: E) -> Self {
        Self {
            effect,
            input: None,
        }
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub fn into_inner(self) -> E {
        self.effect
    }
}

impl<E: Effect> GraphNode for EffectNode<E> {
    fn render_block(&mut self, out: &mut Block) {
        let input = scratch(&mut self.input, out);
        input.copy_from(out);
        out.copy_from(self.effect.apply(input));
    }
}
