use std::sync::Arc;

use tracing::debug;

use crate::block::{Block, Control};
use crate::dsp::table::SampleTable;
use crate::{AudioParams, Error, Result};

/// Plays a [`SampleTable`] at a variable speed.
///
/// Speed 1.0 is the recorded rate in frames per output sample; negative
/// speeds play backwards. Reads between frames interpolate linearly. When
/// the play head leaves the table it either wraps to the other end or falls
/// silent.
pub struct SampleReader {
    table: Arc<SampleTable>,
    // frames, fractional
    position: f64,
    channel: usize,
    wrap: bool,
    out: Block,
}

impl SampleReader {
    /// Start `skip` seconds into `table`, reading its first channel.
    pub fn new(
        params: &AudioParams,
        table: Arc<SampleTable>,
        skip: f64,
        wrap: bool,
    ) -> Result<Self> {
        let frames = table.frames();
        let start = skip * f64::from(table.sample_rate());
        if skip < 0.0 || start >= frames as f64 {
            return Err(Error::SeekOutOfRange {
                requested: start.max(0.0) as usize,
                available: frames,
            });
        }
        debug!(start, frames, wrap, "sample reader positioned");

        Ok(Self {
            table,
            position: start.floor(),
            channel: 0,
            wrap,
            out: Block::new(params),
        })
    }

    /// Read channel `channel` of a multichannel table instead of the first.
    pub fn with_channel(mut self, channel: u16) -> Result<Self> {
        if channel >= self.table.channels() {
            return Err(Error::invalid(format!(
                "channel {channel} out of range for a {}-channel table",
                self.table.channels()
            )));
        }
        self.channel = channel as usize;
        Ok(self)
    }

    /// Play one block at `speed`, fixed or per-sample.
    pub fn process<'a>(&mut self, speed: impl Into<Control<'a>>) -> &Block {
        let speed = speed.into();
        let frames = self.table.frames() as f64;

        for i in 0..self.out.len() {
            if self.position < 0.0 || self.position >= frames {
                if !self.wrap {
                    self.out[i] = 0.0;
                    continue;
                }
                self.position = self.position.rem_euclid(frames);
                if self.position >= frames {
                    self.position = 0.0;
                }
            }

            self.out[i] = self.read_at(self.position);
            self.position += speed.at(i);
        }

        &self.out
    }

    #[inline]
    fn read_at(&self, position: f64) -> f64 {
        let frame = position as usize;
        let frac = position - frame as f64;
        let a = self.sample(frame);
        if frac == 0.0 {
            return a;
        }
        a + frac * (self.sample(frame + 1) - a)
    }

    // Past the last frame reads the zero guard.
    #[inline]
    fn sample(&self, frame: usize) -> f64 {
        let index = frame * self.table.channels() as usize + self.channel;
        self.table.samples().get(index).copied().unwrap_or(0.0)
    }

    /// Play head in frames.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// True once a non-wrapping reader has run off either end.
    pub fn is_finished(&self) -> bool {
        !self.wrap && (self.position < 0.0 || self.position >= self.table.frames() as f64)
    }

    pub fn output(&self) -> &Block {
        &self.out
    }
}
