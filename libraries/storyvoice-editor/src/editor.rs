//! Editor view: page audio, effect selection and baking
//!
//! Handlers take `&mut self` and run to completion, so routing always
//! reflects the most recent selection. Baking is split so the host can keep
//! handling input while the render runs: [`EditorView::begin_bake`] captures
//! everything the job needs, [`BakeJob::run`] does the work off the view, and
//! [`EditorView::complete_bake`] applies the result only if the view still
//! shows the page the job was started for.

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::fetch::{load_bytes, AssetFetcher};
use crate::notice::{Notice, Notifier};
use crate::session::EffectSession;
use crate::types::{AudioAsset, Page};
use std::sync::Arc;
use storyvoice_audio::effects::{
    BufferedMedia, LiveRoutingEngine, MediaElement, OfflineRenderer, ParameterSnapshot,
};
use storyvoice_audio::graph::FilterKind;
use storyvoice_audio::SymphoniaDecoder;
use storyvoice_core::AudioBuffer;
use tracing::instrument;

const WAV_MIME: &str = "audio/wav";

/// What happened to a bake result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeStatus {
    /// The page's audio was replaced
    Applied,
    /// The bake failed; the page's audio is untouched and the user was told
    Failed,
    /// The view moved on before the result arrived; nothing changed
    Discarded,
}

/// Result of a finished bake job
#[derive(Debug)]
pub struct BakeOutcome {
    page: usize,
    generation: u64,
    effect: &'static str,
    result: Result<Vec<u8>>,
}

impl BakeOutcome {
    /// Page index the job was started for
    pub fn page(&self) -> usize {
        self.page
    }

    /// Effect that was baked
    pub fn effect(&self) -> &'static str {
        self.effect
    }

    /// WAV bytes, or why there are none
    pub fn result(&self) -> &Result<Vec<u8>> {
        &self.result
    }
}

/// A bake captured from the view, ready to run
pub struct BakeJob {
    page: usize,
    generation: u64,
    asset: AudioAsset,
    snapshot: ParameterSnapshot,
    fetcher: Arc<dyn AssetFetcher>,
    renderer: OfflineRenderer,
}

impl BakeJob {
    /// Page index the job renders
    pub fn page(&self) -> usize {
        self.page
    }

    /// Snapshot the job renders with
    pub fn snapshot(&self) -> &ParameterSnapshot {
        &self.snapshot
    }

    /// Fetch, decode, render and encode
    ///
    /// The CPU-bound part runs on the blocking pool. There is no
    /// cancellation: a started job always produces an outcome.
    #[instrument(skip(self), fields(page = self.page + 1, effect = self.snapshot.effect))]
    pub async fn run(self) -> BakeOutcome {
        let result = self.render().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Bake failed");
        }

        BakeOutcome {
            page: self.page,
            generation: self.generation,
            effect: self.snapshot.effect,
            result,
        }
    }

    async fn render(&self) -> Result<Vec<u8>> {
        let bytes = load_bytes(self.fetcher.as_ref(), &self.asset).await?;
        let hint = self.asset.extension_hint();
        let renderer = self.renderer;
        let snapshot = self.snapshot;

        let wav = tokio::task::spawn_blocking(move || renderer.bounce(bytes, hint.as_deref(), &snapshot))
            .await??;
        Ok(wav)
    }
}

async fn load_audio(
    fetcher: &dyn AssetFetcher,
    decoder: SymphoniaDecoder,
    asset: &AudioAsset,
) -> Result<AudioBuffer> {
    let bytes = load_bytes(fetcher, asset).await?;
    let hint = asset.extension_hint();

    let buffer = tokio::task::spawn_blocking(move || decoder.decode_memory(bytes, hint.as_deref()))
        .await??;
    Ok(buffer)
}

/// One open book in the editor
pub struct EditorView {
    config: EditorConfig,
    pages: Vec<Page>,
    current: Option<usize>,
    generation: u64,
    session: EffectSession,
    engine: LiveRoutingEngine,
    renderer: OfflineRenderer,
    decoder: SymphoniaDecoder,
    fetcher: Arc<dyn AssetFetcher>,
    notifier: Arc<dyn Notifier>,
}

impl EditorView {
    /// Create a view with no page open
    pub fn new(
        config: EditorConfig,
        pages: Vec<Page>,
        fetcher: Arc<dyn AssetFetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let graph_settings = config.graph_settings();
        let session = EffectSession::new(config.playback.master_volume);
        let mut engine = LiveRoutingEngine::new(graph_settings);
        engine.apply(session.snapshot());

        Self {
            config,
            pages,
            current: None,
            generation: 0,
            session,
            engine,
            renderer: OfflineRenderer::new(graph_settings),
            decoder: SymphoniaDecoder::new(),
            fetcher,
            notifier,
        }
    }

    /// Open a page and attach its narration to the live graph
    ///
    /// A page without audio attaches nothing. Audio that cannot be loaded is
    /// reported to the user and leaves the graph detached.
    pub async fn open_page(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(EditorError::PageOutOfRange {
                index,
                count: self.pages.len(),
            });
        }

        self.engine.detach();
        self.generation += 1;
        self.current = Some(index);

        let Some(asset) = self.pages[index].audio.clone() else {
            tracing::debug!(page = index + 1, "Page has no audio");
            return Ok(());
        };

        let fetcher = Arc::clone(&self.fetcher);
        let buffer = match load_audio(fetcher.as_ref(), self.decoder, &asset).await {
            Ok(buffer) => buffer,
            Err(e) => {
                self.notifier
                    .notify(Notice::error(format!("Could not load the page audio: {}", e)));
                return Err(e);
            }
        };

        self.attach(index, buffer);
        Ok(())
    }

    fn attach(&mut self, index: usize, buffer: AudioBuffer) {
        let media = BufferedMedia::new(format!("page-{}", index + 1), buffer);
        self.engine.attach(Some(Box::new(media) as Box<dyn MediaElement>));
    }

    /// Select an effect and rebuild the live routing
    pub fn select_effect(&mut self, effect_id: &str) {
        let snapshot = *self.session.select(effect_id);
        self.engine.apply(&snapshot);
    }

    /// Filter kind selector
    pub fn set_filter_kind(&mut self, kind: FilterKind) {
        self.session.set_filter_kind(kind);
        self.push_params();
    }

    /// Frequency field
    pub fn set_frequency(&mut self, frequency: f32) {
        if self.session.set_frequency(frequency) {
            self.push_params();
        }
    }

    /// Q field
    pub fn set_q(&mut self, q: f32) {
        if self.session.set_q(q) {
            self.push_params();
        }
    }

    /// Gain field
    pub fn set_gain(&mut self, gain_db: f32) {
        if self.session.set_gain(gain_db) {
            self.push_params();
        }
    }

    /// Master volume control
    pub fn set_master_volume(&mut self, volume: f32) {
        if self.session.set_master_volume(volume) {
            self.push_params();
        }
    }

    fn push_params(&mut self) {
        self.engine.update_params(self.session.snapshot());
    }

    /// Capture a bake of the current page with the current selection
    ///
    /// Fails (and tells the user) when no page is open or the page has no
    /// audio.
    pub fn begin_bake(&self) -> Result<BakeJob> {
        let Some(page) = self.current else {
            self.notifier.notify(Notice::error("Open a page before saving an effect."));
            return Err(EditorError::NoPageOpen);
        };

        let Some(asset) = self.pages[page].audio.clone() else {
            self.notifier.notify(Notice::error("There is no audio on this page."));
            return Err(EditorError::NoAudio(page + 1));
        };

        Ok(BakeJob {
            page,
            generation: self.generation,
            asset,
            snapshot: *self.session.snapshot(),
            fetcher: Arc::clone(&self.fetcher),
            renderer: self.renderer,
        })
    }

    /// Apply a finished bake
    ///
    /// Results for a page that is no longer open, or from before the view
    /// was reopened or closed, are dropped without telling the user.
    pub fn complete_bake(&mut self, outcome: BakeOutcome) -> BakeStatus {
        if outcome.generation != self.generation || self.current != Some(outcome.page) {
            tracing::debug!(
                page = outcome.page + 1,
                effect = outcome.effect,
                "Discarding stale bake result"
            );
            return BakeStatus::Discarded;
        }

        let wav = match outcome.result {
            Ok(wav) => wav,
            Err(e) => {
                self.notifier
                    .notify(Notice::error(format!("Could not save the effect: {}", e)));
                return BakeStatus::Failed;
            }
        };

        // Decode before touching the page so a bad result changes nothing
        let buffer = match self.decoder.decode_memory(wav.clone(), Some("wav")) {
            Ok(buffer) => buffer,
            Err(e) => {
                self.notifier
                    .notify(Notice::error(format!("Could not save the effect: {}", e)));
                return BakeStatus::Failed;
            }
        };

        let page = outcome.page;
        let file_name = self.config.baked_file_name(page);
        self.pages[page].audio = Some(AudioAsset::in_memory(wav, file_name.clone(), WAV_MIME));

        if !self.engine.replace_media(buffer.clone()) {
            self.attach(page, buffer);
        }

        tracing::info!(page = page + 1, effect = outcome.effect, %file_name, "Applied baked effect");
        self.notifier
            .notify(Notice::info("The effect was saved to the page audio."));
        BakeStatus::Applied
    }

    /// Bake the current page and apply the result
    pub async fn bake(&mut self) -> BakeStatus {
        let job = match self.begin_bake() {
            Ok(job) => job,
            Err(_) => return BakeStatus::Failed,
        };
        let outcome = job.run().await;
        self.complete_bake(outcome)
    }

    /// Tear down the live graph and invalidate in-flight bakes
    pub fn close(&mut self) {
        self.engine.detach();
        self.generation += 1;
        self.current = None;
    }

    /// Pages and their current audio
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Index of the open page
    pub fn current_page(&self) -> Option<usize> {
        self.current
    }

    /// Effect selection state
    pub fn session(&self) -> &EffectSession {
        &self.session
    }

    /// The live engine
    pub fn engine(&self) -> &LiveRoutingEngine {
        &self.engine
    }

    /// The live engine, for the audio callback's `render` pulls
    pub fn engine_mut(&mut self) -> &mut LiveRoutingEngine {
        &mut self.engine
    }
}
