use crate::block::Block;
use crate::dsp::filter::{Filter, Recursive};
use crate::graph::node::{scratch, GraphNode};

/*
Filter Node
===========

Runs a one-pole or Butterworth filter over whatever the previous node
rendered. The cutoff is either the filter's own fixed value or swept by
another node:

    cutoff[n] = base + depth × modulator[n]

clamped to [20 Hz, 0.49 × sample rate] so a wild modulator can't push the
design past Nyquist. A swept cutoff redesigns the coefficients every sample.

Example usage:
  // Fixed lowpass
  let dark = saw.through(FilterNode::new(Butterworth::butter_lp(&params, 800.0)));

  // Envelope-swept lowpass: 200 Hz rising to 3200 Hz
  let sweep = Envelope::linesegs(&params, &[0.0, 1.0, 0.2], &[0.05, 0.8], true, false)?;
  let filter = FilterNode::new(Butterworth::butter_lp(&params, 200.0))
      .modulate_cutoff(sweep, 3000.0);
*/

const MIN_CUTOFF: f64 = 20.0;
const MAX_CUTOFF_RATIO: f64 = 0.49;

pub struct FilterNode<R> {
    filter: Filter<R>,
    base_cutoff: f64,
    sweep: Option<(Box<dyn GraphNode>, f64)>,
    input: Option<Block>,
    control: Option<Block>,
}

impl<R: Recursive> FilterNode<R> {
    pub fn new(filter: Filter<R>) -> Self {
        let base_cutoff = filter.cutoff();
        Self {
            filter,
            base_cutoff,
            sweep: None,
            input: None,
            control: None,
        }
    }

    /// Drive the cutoff from `modulator`, scaled by `depth` Hz per unit.
    pub fn modulate_cutoff(mut self, modulator: impl GraphNode + 'static, depth: f64) -> Self {
        self.sweep = Some((Box::new(modulator), depth));
        self
    }

    pub fn filter(&self) -> &Filter<R> {
        &self.filter
    }
}

impl<R: Recursive + Send> GraphNode for FilterNode<R> {
    fn render_block(&mut self, out: &mut Block) {
        let input = scratch(&mut self.input, out);
        input.copy_from(out);

        match &mut self.sweep {
            None => {
                out.copy_from(self.filter.process(input, self.base_cutoff));
            }
            Some((modulator, depth)) => {
                let control = scratch(&mut self.control, out);
                modulator.render_block(control);

                // at very low rates the ceiling falls under the floor
                let ceiling = (self.filter.sample_rate() * MAX_CUTOFF_RATIO).max(MIN_CUTOFF);
                for c in control.as_mut_slice() {
                    *c = (self.base_cutoff + *depth * *c).clamp(MIN_CUTOFF, ceiling);
                }
                out.copy_from(self.filter.process(input, &*control));
            }
        }
    }
}
