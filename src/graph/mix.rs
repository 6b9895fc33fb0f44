use crate::block::Block;
use crate::graph::node::{scratch, GraphNode};

/*
Parallel Signal Mixing
======================

Mix renders two nodes and sums them with a linear crossfade:

  output = A × (1 − balance) + B × balance

  balance = 0.0 → all A
  balance = 0.5 → half of each
  balance = 1.0 → all B

Linear crossfading dips in perceived loudness around the middle. Apply an
equal-power curve to the balance before building the node if that matters.

Uses: layering detuned oscillators, wet/dry blends (a dry source mixed with
the same source run through a reverb), parallel chains.
*/

pub struct Mix<A, B> {
    pub source_a: A,
    pub source_b: B,
    pub balance: f64, // 0.0 = all A, 1.0 = all B
    scratch: Option<Block>,
}

impl<A, B> Mix<A, B> {
    pub fn new(source_a: A, source_b: B, balance: f64) -> Self {
        Mix {
            source_a,
            source_b,
            balance: balance.clamp(0.0, 1.0),
            scratch: None,
        }
    }
}

impl<A: GraphNode, B: GraphNode> GraphNode for Mix<A, B> {
    fn render_block(&mut self, out: &mut Block) {
        self.source_a.render_block(out);

        let other = scratch(&mut self.scratch, out);
        other.fill(0.0);
        self.source_b.render_block(other);

        let weight_a = 1.0 - self.balance;
        let weight_b = self.balance;
        for (o, &b) in out.as_mut_slice().iter_mut().zip(other.iter()) {
            *o = *o * weight_a + b * weight_b;
        }
    }

    fn is_active(&self) -> bool {
        self.source_a.is_active() || self.source_b.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::extensions::NodeExt;
    use crate::AudioParams;

    struct Constant(f64);

    impl GraphNode for Constant {
        fn render_block(&mut self, out: &mut Block) {
            out.fill(self.0);
        }
    }

    fn render(node: &mut impl GraphNode) -> Block {
        let mut out = Block::new(&AudioParams::new(44_100, 1, 16).unwrap());
        node.render_block(&mut out);
        out
    }

    #[test]
    fn balance_weights_sources() {
        assert!(render(&mut Constant(1.0).mix(Constant(3.0), 0.0)).iter().all(|&x| x == 1.0));
        assert!(render(&mut Constant(1.0).mix(Constant(3.0), 1.0)).iter().all(|&x| x == 3.0));
        assert!(render(&mut Constant(1.0).mix(Constant(3.0), 0.5)).iter().all(|&x| x == 2.0));
    }

    #[test]
    fn balance_is_clamped() {
        let mixed = Constant(1.0).mix(Constant(3.0), 4.0);
        assert_eq!(mixed.balance, 1.0);
    }
}
