/// Core traits for StoryVoice
use crate::error::Result;
use crate::types::AudioBuffer;
use std::path::Path;

/// Audio decoder trait
///
/// Implementers decode encoded audio (MP3, WAV, ...) into an interleaved
/// `AudioBuffer`. The decoded buffer keeps the source's sample rate and
/// channel count: no resampling, no channel remixing.
pub trait AudioDecoder: Send {
    /// Decode an audio file from the given path (loads entire file)
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded
    fn decode(&mut self, path: &Path) -> Result<AudioBuffer>;

    /// Decode an in-memory encoded asset
    ///
    /// # Arguments
    /// * `bytes` - The complete encoded asset
    /// * `extension_hint` - Optional file extension (e.g. `"mp3"`) used to
    ///   speed up container detection
    ///
    /// # Errors
    /// Returns an error if the bytes are not decodable audio
    fn decode_bytes(&mut self, bytes: Vec<u8>, extension_hint: Option<&str>)
        -> Result<AudioBuffer>;

    /// Check if the decoder supports the given file format
    fn supports_format(&self, path: &Path) -> bool;
}
