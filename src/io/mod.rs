//! Boundary to the outside world.
//!
//! The DSP core only ever sees two collaborators: something that hands over a
//! decoded run of interleaved frames ([`SampleSource`]) and something that
//! accepts finished blocks ([`BlockWriter`]). The WAV and text
//! implementations here are thin wrappers; anything else (a device, a
//! network sink) plugs in through the same traits.

use std::path::Path;

use crate::{Block, Error, Result};

pub mod text;
pub mod wav;

pub use text::TextWriter;
pub use wav::{WavSource, WavWriter};

/// Decoded audio handed to the core by a [`SampleSource`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleData {
    pub channels: u16,
    pub sample_rate: u32,
    pub frames: usize,
    /// Interleaved samples, `frames * channels` long.
    pub samples: Vec<f64>,
}

/// Reads interleaved frames from a path or identifier.
pub trait SampleSource {
    fn read(&self, path: &Path) -> Result<SampleData>;
}

/// Streams finished blocks to a destination.
///
/// Both write methods return the running number of frames written.
pub trait BlockWriter {
    /// Write a mono block, duplicated across every configured channel.
    fn write(&mut self, block: &Block) -> Result<u64>;

    /// Write a left/right pair. Fails unless the writer has two channels.
    fn write_stereo(&mut self, left: &Block, right: &Block) -> Result<u64>;

    /// Flush anything still buffered and close the destination.
    fn finish(&mut self) -> Result<()>;
}

pub(crate) fn require_stereo(channels: u16) -> Result<()> {
    if channels != 2 {
        return Err(Error::ChannelMismatch {
            expected: 2,
            actual: channels,
        });
    }
    Ok(())
}

/// Left and right halves of a stereo frame run must be the same length.
pub(crate) fn require_pair(left: &Block, right: &Block) -> Result<()> {
    if left.len() != right.len() {
        return Err(Error::SizeMismatch {
            expected: left.len(),
            actual: right.len(),
        });
    }
    Ok(())
}
