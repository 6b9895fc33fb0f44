#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, Result, DEFAULT_BLOCK_SIZE, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};

/// Process-wide audio configuration.
///
/// Built once before any component and handed to each constructor by
/// reference. Components copy the values they need, so a snapshot can never
/// change underneath them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawAudioParams"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioParams {
    sample_rate: u32,
    channels: u16,
    block_size: usize,
}

impl AudioParams {
    /// Validate and build a configuration. Every field must be non-zero.
    pub fn new(sample_rate: u32, channels: u16, block_size: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::invalid("sample rate must be positive"));
        }
        if channels == 0 {
            return Err(Error::invalid("channel count must be positive"));
        }
        if block_size == 0 {
            return Err(Error::invalid("block size must be positive"));
        }

        info!(sample_rate, channels, block_size, "audio parameters set");

        Ok(Self {
            sample_rate,
            channels,
            block_size,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Sample rate as a float, the form every recurrence wants.
    #[inline]
    pub fn sr(&self) -> f64 {
        self.sample_rate as f64
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn nyquist(&self) -> f64 {
        self.sr() / 2.0
    }

    /// Convert a duration in seconds to a (fractional) sample count.
    #[inline]
    pub fn seconds_to_samples(&self, seconds: f64) -> f64 {
        seconds * self.sr()
    }
}

/// Unchecked wire form; deserializing goes through [`AudioParams::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawAudioParams {
    sample_rate: u32,
    channels: u16,
    block_size: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAudioParams> for AudioParams {
    type Error = Error;

    fn try_from(raw: RawAudioParams) -> Result<Self> {
        AudioParams::new(raw.sample_rate, raw.channels, raw.block_size)
    }
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}
