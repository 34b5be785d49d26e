//! StoryVoice Editor
//!
//! Binds the voice effects engine to the audiobook editor: the effect
//! palette and filter controls, the page's narration asset, and the "bake"
//! action that replaces a page's audio with the effect applied.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storyvoice_editor::{
//!     AudioAsset, BakeStatus, EditorConfig, EditorView, HttpFetcher, Page, TracingNotifier,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EditorConfig::load()?;
//! let fetcher = Arc::new(HttpFetcher::new(config.assets.base_url.as_deref())?);
//! let pages = vec![Page::with_audio(AudioAsset::url("/media/tts/page_1.mp3"))];
//!
//! let mut view = EditorView::new(config, pages, fetcher, Arc::new(TracingNotifier));
//! view.open_page(0).await?;
//! view.select_effect("cave");
//!
//! assert_eq!(view.bake().await, BakeStatus::Applied);
//! # Ok(())
//! # }
//! ```

pub mod config;
mod editor;
pub mod error;
pub mod fetch;
pub mod notice;
mod session;
pub mod types;

pub use config::EditorConfig;
pub use editor::{BakeJob, BakeOutcome, BakeStatus, EditorView};
pub use error::{EditorError, Result};
pub use fetch::{AssetFetcher, HttpFetcher, StaticFetcher};
pub use notice::{Notice, NoticeLevel, NoticeLog, Notifier, TracingNotifier};
pub use session::EffectSession;
pub use types::{AssetSource, AudioAsset, Page};
