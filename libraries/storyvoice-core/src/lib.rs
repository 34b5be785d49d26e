//! StoryVoice Core
//!
//! Platform-agnostic audio types, traits, and error handling shared by the
//! voice effects engine and the editor binding.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Audio Types**: `SampleRate`, `AudioFormat`, interleaved `AudioBuffer`
//! - **Core Traits**: `AudioDecoder`
//! - **Error Handling**: Unified `StoryVoiceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use storyvoice_core::{AudioBuffer, AudioFormat, SampleRate};
//!
//! // One second of mono silence at 44.1 kHz
//! let format = AudioFormat::new(SampleRate::CD_QUALITY, 1, 32);
//! let buffer = AudioBuffer::new(vec![0.0; 44_100], format);
//!
//! assert_eq!(buffer.frames(), 44_100);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, StoryVoiceError};
pub use traits::AudioDecoder;
pub use types::{AudioBuffer, AudioFormat, SampleRate};
