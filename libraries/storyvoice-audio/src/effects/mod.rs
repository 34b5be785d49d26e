//! Voice effects
//!
//! - **preset**: the named effect table
//! - **routing**: which branches an effect wires
//! - **snapshot**: the selection as a value object
//! - **voice**: the graph both paths build
//! - **live**: real-time engine bound to a media element
//! - **offline**: whole-buffer bounce to WAV

mod live;
mod offline;
pub mod preset;
mod routing;
mod snapshot;
mod voice;

pub use live::{BufferedMedia, LiveRoutingEngine, MediaElement};
pub use offline::OfflineRenderer;
pub use preset::{lookup, palette, PresetParams, DEFAULT_EFFECT};
pub use routing::{classify, RoutingCategory};
pub use snapshot::ParameterSnapshot;
pub use voice::{GraphSettings, VoiceGraph, VoiceNodes};
