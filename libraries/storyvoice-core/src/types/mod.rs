//! Shared types

mod audio;

pub use audio::{AudioBuffer, AudioFormat, SampleRate};
