use crate::block::Block;
use crate::graph::node::{scratch, GraphNode};

/// Multiply a signal by a modulator, sample by sample.
///
/// With an envelope as the modulator this is a VCA; with an audio-rate
/// oscillator it is ring modulation.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    scratch: Option<Block>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            scratch: None,
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut Block) {
        self.signal.render_block(out);

        let gain = scratch(&mut self.scratch, out);
        gain.fill(0.0);
        self.modulator.render_block(gain);

        for (o, &m) in out.as_mut_slice().iter_mut().zip(gain.iter()) {
            *o *= m;
        }
    }

    fn is_active(&self) -> bool {
        self.modulator.is_active() && self.signal.is_active()
    }
}
