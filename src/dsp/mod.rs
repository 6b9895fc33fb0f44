//! Low-level DSP primitives used by the graph nodes.
//!
//! Every component is built from an [`AudioParams`](crate::AudioParams)
//! snapshot, owns its output block and returns it by reference from
//! `process`. State (phase, delay registers, write cursors, envelope
//! position) carries over between calls, so one instance belongs to one
//! signal path.

/// Fractional delay lines: feedback comb and allpass.
pub mod delay;
/// Linear and exponential breakpoint envelopes.
pub mod envelope;
/// One-pole and Butterworth recursive filters.
pub mod filter;
/// Seeded white noise.
pub mod noise;
/// Table-lookup oscillators, phasor and table reader.
pub mod oscillator;
/// Schroeder reverberator.
pub mod reverb;
/// Variable-speed sample playback.
pub mod sampler;
/// Function tables and sampled audio tables.
pub mod table;

pub use delay::{Allpass, Delay, TimeUnit};
pub use envelope::{Curve, Envelope, EnvelopeStage};
pub use filter::{Butterworth, ToneFilter};
pub use noise::WhiteNoise;
pub use oscillator::{Interpolation, Oscillator, Phasor, TableReader};
pub use reverb::Reverb;
pub use sampler::SampleReader;
pub use table::{FuncTable, SampleTable, Waveform};
