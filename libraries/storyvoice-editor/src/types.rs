//! Pages and their narration assets

use std::sync::Arc;

/// Where an audio asset's bytes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Served by the backend (absolute or relative to the configured base URL)
    Url(String),
    /// Held in memory by the page (uploaded or baked)
    Bytes(Arc<[u8]>),
}

/// A page's narration audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    pub source: AssetSource,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl AudioAsset {
    /// Asset served from a URL
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            source: AssetSource::Url(url.into()),
            file_name: None,
            mime_type: None,
        }
    }

    /// Asset held in memory
    pub fn in_memory(bytes: impl Into<Arc<[u8]>>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            source: AssetSource::Bytes(bytes.into()),
            file_name: Some(file_name.into()),
            mime_type: Some(mime_type.into()),
        }
    }

    /// Container hint for the decoder (`"mp3"`, `"wav"`, ...)
    ///
    /// Taken from the file name, then the URL path, then the MIME type.
    pub fn extension_hint(&self) -> Option<String> {
        let from_name = self.file_name.as_deref().and_then(extension_of);
        let from_url = match &self.source {
            AssetSource::Url(url) => extension_of(url.split(['?', '#']).next().unwrap_or(url)),
            AssetSource::Bytes(_) => None,
        };
        let from_mime = self.mime_type.as_deref().and_then(|mime| {
            match mime.split(';').next().unwrap_or(mime).trim() {
                "audio/mpeg" | "audio/mp3" => Some("mp3".to_string()),
                "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav".to_string()),
                "audio/ogg" => Some("ogg".to_string()),
                "audio/flac" => Some("flac".to_string()),
                "audio/aac" => Some("aac".to_string()),
                "audio/mp4" => Some("m4a".to_string()),
                _ => None,
            }
        });

        from_name.or(from_url).or(from_mime)
    }
}

fn extension_of(path: &str) -> Option<String> {
    let name = path.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// One page of the book being edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Narration audio, if any has been generated or uploaded
    pub audio: Option<AudioAsset>,
}

impl Page {
    /// Page with narration
    pub fn with_audio(audio: AudioAsset) -> Self {
        Self { audio: Some(audio) }
    }

    /// Page without narration
    pub fn silent() -> Self {
        Self { audio: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_hint_prefers_file_name() {
        let asset = AudioAsset::in_memory(vec![0u8; 4], "page_1_filtered.WAV", "audio/mpeg");
        assert_eq!(asset.extension_hint().as_deref(), Some("wav"));
    }

    #[test]
    fn extension_hint_from_url_ignores_query() {
        let asset = AudioAsset::url("/media/tts/page_3.mp3?v=2");
        assert_eq!(asset.extension_hint().as_deref(), Some("mp3"));

        let dotted_dir = AudioAsset::url("https://cdn.example.com/v1.2/stream");
        assert_eq!(dotted_dir.extension_hint(), None);
    }

    #[test]
    fn extension_hint_from_mime() {
        let asset = AudioAsset {
            source: AssetSource::Bytes(Arc::from(vec![1u8, 2, 3])),
            file_name: None,
            mime_type: Some("audio/wav; codecs=1".to_string()),
        };
        assert_eq!(asset.extension_hint().as_deref(), Some("wav"));
    }
}
