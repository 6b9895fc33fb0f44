use crate::block::Block;
use crate::graph::node::GraphNode;

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series: the first renders, the second
transforms that block in place. Chains such as oscillator → filter → reverb
are nested Throughs.

  Source renders:   [0.5, 0.8, -0.3, 0.9, ...]
  Effect rewrites:  [0.4, 0.6, -0.2, 0.7, ...]

Typical chain:

  let patch = Oscillator::oscili(&params, 0.5, 110.0, saw)
      .through(FilterNode::new(Butterworth::butter_lp(&params, 800.0)))
      .through(EffectNode::new(Reverb::new(&params, 2.0)));

Through vs Amplify vs Mix:
--------------------------
  Through: [Source] ──→ [Effect] ──→ output

  Amplify: [Signal] ──┬──→ (×) ──→ output
           [Mod]    ──┘

  Mix:     [A] ──────┬──→ (+) ──→ output
           [B] ──────┘

The second node of a Through sees the first node's output in `out`, so it
must be something that transforms its input (an effect), not a source that
overwrites it.
*/

pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut Block) {
        self.source.render_block(out);
        self.effect.render_block(out);
    }

    fn is_active(&self) -> bool {
        self.source.is_active() || self.effect.is_active()
    }
}
