pub mod block;
pub mod dsp;
pub mod error;
pub mod graph; // Composable signal chains
pub mod io; // Sample sources and block writers
pub mod params;

pub use block::{Block, Control};
pub use error::{Error, Result};
pub use params::AudioParams;

/// Default number of samples per block.
pub const DEFAULT_BLOCK_SIZE: usize = 64;
/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// Default channel count.
pub const DEFAULT_CHANNELS: u16 = 1;
/// Default function table length.
pub const DEFAULT_TABLE_SIZE: usize = 4096;

/// Floor used in place of zero for exponential curves.
pub(crate) const EXP_FLOOR: f64 = 0.001;
