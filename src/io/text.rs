use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::warn;

use super::{require_pair, require_stereo, BlockWriter};
use crate::{Block, Error, Result};

/// Dumps blocks as text, one frame per line.
///
/// Stereo frames are written as `left<TAB>right`. Handy for plotting a
/// signal or diffing it in a test.
pub struct TextWriter<W: Write> {
    out: W,
    channels: u16,
    frames: u64,
}

impl TextWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>, channels: u16) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "cannot open text destination");
            Error::unavailable(path, e)
        })?;
        Ok(Self::new(BufWriter::new(file), channels))
    }
}

impl<W: Write> TextWriter<W> {
    pub fn new(out: W, channels: u16) -> Self {
        Self {
            out,
            channels,
            frames: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn io(e: std::io::Error) -> Error {
        Error::unavailable("<text sink>", e)
    }
}

impl<W: Write> BlockWriter for TextWriter<W> {
    fn write(&mut self, block: &Block) -> Result<u64> {
        for sample in block.iter() {
            writeln!(self.out, "{sample:.6}").map_err(Self::io)?;
        }
        self.frames += block.len() as u64;
        Ok(self.frames)
    }

    fn write_stereo(&mut self, left: &Block, right: &Block) -> Result<u64> {
        require_stereo(self.channels)?;
        require_pair(left, right)?;
        for (l, r) in left.iter().zip(right.iter()) {
            writeln!(self.out, "{l:.6}\t{r:.6}").map_err(Self::io)?;
        }
        self.frames += left.len() as u64;
        Ok(self.frames)
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().map_err(Self::io)
    }
}
