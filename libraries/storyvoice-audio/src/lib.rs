//! StoryVoice Audio
//!
//! Voice effects for page narration: a named preset table, a small audio
//! processing graph, a live routing engine for preview and an offline
//! renderer that bakes the selected effect into a 16-bit PCM WAV.
//!
//! This crate provides:
//! - Audio decoding via Symphonia (MP3, FLAC, OGG, WAV, AAC)
//! - Biquad filter, delay line, gain and LFO nodes wired by connections
//! - One routing function shared by preview and bounce
//! - Canonical WAV encoding
//!
//! # Example: Bouncing a buffer
//!
//! ```rust
//! use storyvoice_audio::effects::{OfflineRenderer, ParameterSnapshot};
//! use storyvoice_audio::encode_wav;
//! use storyvoice_core::{AudioBuffer, AudioFormat, SampleRate};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let format = AudioFormat::new(SampleRate::CD_QUALITY, 1, 32);
//! let narration = AudioBuffer::silence(88_200, format);
//!
//! let renderer = OfflineRenderer::default();
//! let rendered = renderer.render(&narration, &ParameterSnapshot::for_effect("cave"))?;
//! let wav = encode_wav(&rendered)?;
//!
//! assert_eq!(wav.len(), 44 + 88_200 * 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Example: Live preview
//!
//! ```rust
//! use storyvoice_audio::effects::{BufferedMedia, LiveRoutingEngine, MediaElement, ParameterSnapshot};
//! use storyvoice_core::{AudioBuffer, AudioFormat, SampleRate};
//!
//! let format = AudioFormat::new(SampleRate::CD_QUALITY, 2, 32);
//! let page = BufferedMedia::new("page-1", AudioBuffer::silence(4_410, format));
//!
//! let mut engine = LiveRoutingEngine::default();
//! engine.attach(Some(Box::new(page) as Box<dyn MediaElement>));
//! engine.apply(&ParameterSnapshot::for_effect("robot"));
//!
//! // Called from the audio callback
//! let mut block = vec![0.0; 512 * 2];
//! engine.render(&mut block);
//! ```

mod decoder;
pub mod effects;
mod error;
pub mod graph;
mod wav;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use decoder::SymphoniaDecoder;
pub use error::{AudioError, Result};
pub use wav::{encode_wav, sample_to_i16, WAV_HEADER_LEN};
