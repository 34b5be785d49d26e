/// Editor errors
use storyvoice_audio::AudioError;
use thiserror::Error;

/// Result type alias using `EditorError`
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    /// The page has no narration audio (1-based page number)
    #[error("No audio on page {0}")]
    NoAudio(usize),

    /// No page is open
    #[error("No page is open")]
    NoPageOpen,

    /// Page index outside the book
    #[error("Page {index} out of range ({count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Asset could not be fetched
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Decoding, rendering or encoding failed
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// The render worker did not finish
    #[error("Render task failed: {0}")]
    Render(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for EditorError {
    fn from(err: reqwest::Error) -> Self {
        EditorError::Fetch(err.to_string())
    }
}

impl From<config::ConfigError> for EditorError {
    fn from(err: config::ConfigError) -> Self {
        EditorError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for EditorError {
    fn from(err: tokio::task::JoinError) -> Self {
        EditorError::Render(err.to_string())
    }
}
