use crate::block::Block;
use crate::dsp::noise::WhiteNoise;
use crate::dsp::oscillator::{Oscillator, Phasor};
use crate::dsp::sampler::SampleReader;
use crate::graph::node::GraphNode;

/*
Sources
=======

Every generator renders its own block and the node copies it out. Sources
ignore whatever `out` held before, so they belong at the head of a chain:

  Oscillator    table lookup at a fixed amplitude and frequency
  Phasor        raw [0, 1) ramp, for driving a TableReader elsewhere
  WhiteNoise    uniform noise
  SampleReader  recorded audio at unit speed; inactive once it runs out

To modulate a source per sample, call its `process_with` directly and feed
the block into a chain through a custom node instead.
*/

impl GraphNode for Oscillator {
    fn render_block(&mut self, out: &mut Block) {
        out.copy_from(self.process());
    }
}

impl GraphNode for Phasor {
    fn render_block(&mut self, out: &mut Block) {
        out.copy_from(self.process());
    }
}

impl GraphNode for WhiteNoise {
    fn render_block(&mut self, out: &mut Block) {
        out.copy_from(self.process());
    }
}

impl GraphNode for SampleReader {
    fn render_block(&mut self, out: &mut Block) {
        out.copy_from(self.process(1.0));
    }

    fn is_active(&self) -> bool {
        !self.is_finished()
    }
}
