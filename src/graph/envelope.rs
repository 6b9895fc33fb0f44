use crate::block::Block;
use crate::dsp::envelope::Envelope;
use crate::graph::node::GraphNode;

/// Envelopes render as control sources, usually fed to [`Amplify`] or used
/// to sweep a [`FilterNode`] cutoff.
///
/// A held envelope stops being active once it parks on its last breakpoint;
/// repeating and free-running envelopes never finish.
///
/// [`Amplify`]: crate::graph::amplify::Amplify
/// [`FilterNode`]: crate::graph::filter::FilterNode
impl GraphNode for Envelope {
    fn render_block(&mut self, out: &mut Block) {
        out.copy_from(self.process());
    }

    fn is_active(&self) -> bool {
        !self.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AudioParams;

    #[test]
    fn continues_across_blocks() {
        let p = AudioParams::new(1_000, 1, 4).unwrap();
        let mut env = Envelope::lineseg(&p, 0.0, 0.008, 1.0, true, false);
        let mut out = Block::new(&p);

        env.render_block(&mut out);
        assert_eq!(out.as_slice(), &[0.0, 0.125, 0.25, 0.375]);
        env.render_block(&mut out);
        assert_eq!(out.as_slice(), &[0.5, 0.625, 0.75, 0.875]);
        assert!(env.is_active());

        env.render_block(&mut out);
        assert_eq!(out.as_slice(), &[1.0; 4]);
        assert!(!env.is_active());
    }
}
