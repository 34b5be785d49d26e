/// Core error types for StoryVoice
use thiserror::Error;

/// Result type alias using `StoryVoiceError`
pub type Result<T> = std::result::Result<T, StoryVoiceError>;

/// Core error type for StoryVoice
#[derive(Error, Debug)]
pub enum StoryVoiceError {
    /// Audio decoding/rendering errors
    #[error("Audio error: {0}")]
    Audio(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl StoryVoiceError {
    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
