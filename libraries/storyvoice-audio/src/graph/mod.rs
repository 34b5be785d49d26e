//! Audio processing graph
//!
//! A small, sample-accurate subset of a browser audio graph: a source, biquad
//! filters, delay lines, gain stages with a modulatable gain parameter, sine
//! oscillators and destinations, wired by explicit connections.
//!
//! Connections into a delay line do not constrain processing order, so a
//! feedback loop is legal as long as it passes through a delay.

mod audio_graph;
mod biquad;
mod delay;
mod node;

pub use audio_graph::AudioGraph;
pub use biquad::{BiquadFilter, FilterKind, FilterSettings, ParseFilterKindError};
pub use delay::DelayLine;
pub use node::{Connection, Endpoint, GainNode, NodeId, NodeKind, Oscillator};
