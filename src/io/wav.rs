use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec};
use tracing::{debug, info, warn};

use super::{require_pair, require_stereo, BlockWriter, SampleData, SampleSource};
use crate::{AudioParams, Block, Error, Result};

/// Reads WAV files of any PCM or float format into normalized `f64` frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavSource;

impl SampleSource for WavSource {
    fn read(&self, path: &Path) -> Result<SampleData> {
        let reader = WavReader::open(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "cannot open sample source");
            Error::unavailable(path, e)
        })?;
        let spec = reader.spec();

        let samples: std::result::Result<Vec<f64>, hound::Error> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect(),
            SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f64;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f64 * scale))
                    .collect()
            }
        };
        let samples = samples.map_err(|e| Error::unavailable(path, e))?;
        let frames = samples.len() / spec.channels.max(1) as usize;

        info!(
            path = %path.display(),
            channels = spec.channels,
            sample_rate = spec.sample_rate,
            frames,
            "loaded sample source"
        );

        Ok(SampleData {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            frames,
            samples,
        })
    }
}

/// Writes blocks to a 16-bit PCM WAV file.
///
/// Mono blocks are duplicated across every configured channel.
pub struct WavWriter {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    path: PathBuf,
    channels: u16,
    frames: u64,
}

impl WavWriter {
    pub fn create(path: impl AsRef<Path>, params: &AudioParams) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let spec = WavSpec {
            channels: params.channels(),
            sample_rate: params.sample_rate(),
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(&path, spec).map_err(|e| {
            warn!(path = %path.display(), error = %e, "cannot open destination");
            Error::unavailable(&path, e)
        })?;
        debug!(path = %path.display(), channels = params.channels(), "opened wav destination");

        Ok(Self {
            writer: Some(writer),
            path,
            channels: params.channels(),
            frames: 0,
        })
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn put(&mut self, value: f64) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(Error::unavailable(&self.path, "writer already finished"));
        };
        let pcm = (value.clamp(-1.0, 1.0) * i16::MAX as f64) as i16;
        writer
            .write_sample(pcm)
            .map_err(|e| Error::unavailable(&self.path, e))
    }
}

impl BlockWriter for WavWriter {
    fn write(&mut self, block: &Block) -> Result<u64> {
        for &sample in block.iter() {
            for _ in 0..self.channels {
                self.put(sample)?;
            }
        }
        self.frames += block.len() as u64;
        Ok(self.frames)
    }

    fn write_stereo(&mut self, left: &Block, right: &Block) -> Result<u64> {
        require_stereo(self.channels)?;
        require_pair(left, right)?;
        for (&l, &r) in left.iter().zip(right.iter()) {
            self.put(l)?;
            self.put(r)?;
        }
        self.frames += left.len() as u64;
        Ok(self.frames)
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|e| Error::unavailable(&self.path, e))?;
            info!(path = %self.path.display(), frames = self.frames, "wav destination closed");
        }
        Ok(())
    }
}
