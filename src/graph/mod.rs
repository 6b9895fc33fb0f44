//! Composable building blocks for constructing signal chains.
//!
//! Graph nodes wrap the block-level DSP primitives behind one trait so that
//! chains can be assembled from parts: a source feeding effects, two sources
//! mixed, a signal shaped by an envelope. The `extensions` module adds fluent
//! helpers so a patch reads left to right.

/// Multiply two signals together (amplitude or ring modulation).
pub mod amplify;
/// Delay and allpass lines as in-place effects.
pub mod delay;
/// In-place processing of a node's output by a block effect.
pub mod effect;
/// Envelope generators as control sources.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.mix()`, `.through()`).
pub mod extensions;
/// Recursive filters with fixed or node-driven cutoff.
pub mod filter;
/// Linear wet/dry mixing for parallel graphs.
pub mod mix;
/// Core trait shared by all graph nodes.
pub mod node;
/// Oscillators, phasors, noise and sample playback as sources.
pub mod oscillator;
/// Reverberator as an in-place effect.
pub mod reverb;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use effect::{Effect, EffectNode};
pub use extensions::NodeExt;
pub use filter::FilterNode;
pub use node::GraphNode;
