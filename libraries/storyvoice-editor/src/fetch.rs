//! Asset fetching
//!
//! Page audio either lives in memory or is served by the backend. Fetches
//! are never retried: every fetch is user-triggered and can be triggered
//! again.

use crate::error::{EditorError, Result};
use crate::types::{AssetSource, AudioAsset};
use async_trait::async_trait;
use reqwest::Url;
use std::collections::HashMap;

/// Source of encoded audio bytes by URL
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the complete body at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches assets over HTTP(S)
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpFetcher {
    /// Create a fetcher resolving relative URLs against `base_url`
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let base_url = base_url
            .map(|base| {
                Url::parse(base).map_err(|e| EditorError::Config(format!("Invalid base URL {}: {}", base, e)))
            })
            .transpose()?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Resolve `url` to an absolute URL
    pub fn resolve(&self, url: &str) -> Result<Url> {
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute);
        }

        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| EditorError::Fetch(format!("Relative URL without base: {}", url)))?;
        base.join(url)
            .map_err(|e| EditorError::Fetch(format!("Invalid URL {}: {}", url, e)))
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let url = self.resolve(url)?;
        tracing::debug!(%url, "Fetching audio asset");

        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Serves a fixed set of assets from memory
///
/// For hosts that ship page audio with the document, and for tests.
#[derive(Debug, Default, Clone)]
pub struct StaticFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    /// Create an empty fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` at `url`
    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(url.into(), bytes);
    }

    /// Builder form of [`StaticFetcher::insert`]
    pub fn with_asset(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }
}

#[async_trait]
impl AssetFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| EditorError::Fetch(format!("404 Not Found: {}", url)))
    }
}

/// Encoded bytes of an asset, fetching URLs through `fetcher`
pub async fn load_bytes(fetcher: &dyn AssetFetcher, asset: &AudioAsset) -> Result<Vec<u8>> {
    match &asset.source {
        AssetSource::Url(url) => fetcher.fetch(url).await,
        AssetSource::Bytes(bytes) => Ok(bytes.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_urls_against_base() {
        let fetcher = HttpFetcher::new(Some("https://books.example.com/app/")).unwrap();
        let url = fetcher.resolve("/media/page_1.mp3").unwrap();
        assert_eq!(url.as_str(), "https://books.example.com/media/page_1.mp3");

        let url = fetcher.resolve("media/page_1.mp3").unwrap();
        assert_eq!(url.as_str(), "https://books.example.com/app/media/page_1.mp3");
    }

    #[test]
    fn absolute_urls_ignore_base() {
        let fetcher = HttpFetcher::new(Some("https://books.example.com/")).unwrap();
        let url = fetcher.resolve("https://cdn.example.com/a.mp3").unwrap();
        assert_eq!(url.host_str(), Some("cdn.example.com"));
    }

    #[test]
    fn relative_url_without_base_fails() {
        let fetcher = HttpFetcher::new(None).unwrap();
        assert!(matches!(
            fetcher.resolve("/media/page_1.mp3"),
            Err(EditorError::Fetch(_))
        ));
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        assert!(matches!(
            HttpFetcher::new(Some("not a url")),
            Err(EditorError::Config(_))
        ));
    }

    #[tokio::test]
    async fn static_fetcher_serves_known_assets() {
        let fetcher = StaticFetcher::new().with_asset("/a.mp3", vec![1, 2, 3]);
        assert_eq!(fetcher.fetch("/a.mp3").await.unwrap(), vec![1, 2, 3]);
        assert!(matches!(fetcher.fetch("/b.mp3").await, Err(EditorError::Fetch(_))));
    }

    #[tokio::test]
    async fn in_memory_assets_skip_the_fetcher() {
        let fetcher = StaticFetcher::new();
        let asset = AudioAsset::in_memory(vec![9u8, 8], "page_1.wav", "audio/wav");
        assert_eq!(load_bytes(&fetcher, &asset).await.unwrap(), vec![9, 8]);
    }
}
