//! Live routing engine
//!
//! Owns the voice graph bound to one playing media element. The platform's
//! audio callback pulls rendered frames with [`LiveRoutingEngine::render`];
//! the editor pushes parameter snapshots in between pulls, so a selection is
//! never applied halfway through a block.

use super::snapshot::ParameterSnapshot;
use super::voice::{GraphSettings, VoiceGraph};
use storyvoice_core::AudioBuffer;

/// A playable media element the engine can attach to
pub trait MediaElement: Send {
    /// Stable identity of the element for the lifetime of its page
    fn element_id(&self) -> &str;

    /// Interleaved channel count of the current media
    fn channels(&self) -> u16;

    /// Sample rate of the current media
    fn sample_rate(&self) -> u32;

    /// Copy the next interleaved frames into `out`
    ///
    /// Returns the number of frames written; fewer than requested means the
    /// media has ended.
    fn read_frames(&mut self, out: &mut [f32]) -> usize;

    /// Replace the media content and rewind
    fn load(&mut self, buffer: AudioBuffer);
}

/// Media element playing a decoded buffer from the start
pub struct BufferedMedia {
    id: String,
    buffer: AudioBuffer,
    position: usize,
}

impl BufferedMedia {
    /// Create an element playing `buffer`
    pub fn new(id: impl Into<String>, buffer: AudioBuffer) -> Self {
        Self {
            id: id.into(),
            buffer,
            position: 0,
        }
    }

    /// Frames played so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every frame has been read
    pub fn is_ended(&self) -> bool {
        self.position >= self.buffer.frames()
    }
}

impl MediaElement for BufferedMedia {
    fn element_id(&self) -> &str {
        &self.id
    }

    fn channels(&self) -> u16 {
        self.buffer.format.channels
    }

    fn sample_rate(&self) -> u32 {
        self.buffer.sample_rate()
    }

    fn read_frames(&mut self, out: &mut [f32]) -> usize {
        let channels = self.buffer.channels();
        if channels == 0 {
            return 0;
        }

        let wanted = out.len() / channels;
        let available = self.buffer.frames().saturating_sub(self.position);
        let frames = wanted.min(available);

        let start = self.position * channels;
        let end = start + frames * channels;
        out[..frames * channels].copy_from_slice(&self.buffer.samples[start..end]);
        self.position += frames;
        frames
    }

    fn load(&mut self, buffer: AudioBuffer) {
        self.buffer = buffer;
        self.position = 0;
    }
}

struct LiveSession {
    media: Box<dyn MediaElement>,
    voice: VoiceGraph,
    input: Vec<f32>,
}

impl LiveSession {
    fn new(media: Box<dyn MediaElement>, settings: GraphSettings, snapshot: &ParameterSnapshot) -> Self {
        let mut voice = VoiceGraph::new(media.channels(), media.sample_rate(), settings);
        voice.apply(snapshot);
        Self {
            media,
            voice,
            input: Vec::new(),
        }
    }
}

/// Real-time voice graph bound to at most one media element
///
/// Not `Clone`: one editor view owns the engine and its graph.
pub struct LiveRoutingEngine {
    settings: GraphSettings,
    snapshot: ParameterSnapshot,
    session: Option<LiveSession>,
}

impl LiveRoutingEngine {
    /// Create a detached engine
    pub fn new(settings: GraphSettings) -> Self {
        Self {
            settings,
            snapshot: ParameterSnapshot::default(),
            session: None,
        }
    }

    /// Bind the graph to a media element
    ///
    /// Returns `true` when a new graph was built. Attaching nothing, an
    /// element without channels, or the element that is already attached
    /// changes nothing. A different element replaces the current session.
    pub fn attach(&mut self, media: Option<Box<dyn MediaElement>>) -> bool {
        let Some(media) = media else {
            tracing::debug!("No media element to attach to");
            return false;
        };

        if media.channels() == 0 || media.sample_rate() == 0 {
            tracing::debug!(element = media.element_id(), "Media element has no playable audio");
            return false;
        }

        if self.media_id() == Some(media.element_id()) {
            return false;
        }

        self.detach();
        tracing::debug!(
            element = media.element_id(),
            channels = media.channels(),
            sample_rate = media.sample_rate(),
            effect = self.snapshot.effect,
            "Attaching live voice graph"
        );
        self.session = Some(LiveSession::new(media, self.settings, &self.snapshot));
        true
    }

    /// Tear down the graph
    pub fn detach(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(element = session.media.element_id(), "Detached live voice graph");
        }
    }

    /// Select: write parameters and rebuild routing
    ///
    /// Stored even while detached so the next attach starts from it.
    pub fn apply(&mut self, snapshot: &ParameterSnapshot) {
        self.snapshot = *snapshot;
        if let Some(session) = &mut self.session {
            session.voice.apply(snapshot);
        }
    }

    /// Control edit: write parameters, keep routing
    pub fn update_params(&mut self, snapshot: &ParameterSnapshot) {
        self.snapshot = *snapshot;
        if let Some(session) = &mut self.session {
            session.voice.write_params(snapshot);
        }
    }

    /// Swap the attached element's media, keeping the element
    ///
    /// The graph is kept when the new media has the same channel count and
    /// sample rate and rebuilt otherwise. Returns `false` when detached.
    pub fn replace_media(&mut self, buffer: AudioBuffer) -> bool {
        let Some(session) = &mut self.session else {
            return false;
        };

        let same_format = buffer.channels() == session.voice.channels()
            && buffer.sample_rate() == session.voice.sample_rate();
        session.media.load(buffer);

        if !same_format {
            let media = session.media.channels();
            tracing::debug!(channels = media, "Media format changed, rebuilding voice graph");
            if let Some(old) = self.session.take() {
                self.session = Some(LiveSession::new(old.media, self.settings, &self.snapshot));
            }
        }
        true
    }

    /// Pull the next block of interleaved output frames
    ///
    /// Once the media has ended silence keeps flowing through the graph so
    /// echo tails ring out. Returns the number of media frames consumed;
    /// when detached `out` is silenced and 0 is returned.
    pub fn render(&mut self, out: &mut [f32]) -> usize {
        let Some(session) = &mut self.session else {
            out.fill(0.0);
            return 0;
        };

        let channels = session.voice.channels();
        let usable = out.len() - out.len() % channels;

        session.input.clear();
        session.input.resize(usable, 0.0);
        let frames = session.media.read_frames(&mut session.input);

        session.voice.process(&session.input, &mut out[..usable]);
        out[usable..].fill(0.0);
        frames
    }

    /// Whether a graph is attached
    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    /// Identity of the attached element
    pub fn media_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.media.element_id())
    }

    /// The attached voice graph
    pub fn voice(&self) -> Option<&VoiceGraph> {
        self.session.as_ref().map(|s| &s.voice)
    }

    /// Last snapshot pushed into the engine
    pub fn snapshot(&self) -> &ParameterSnapshot {
        &self.snapshot
    }
}

impl Default for LiveRoutingEngine {
    fn default() -> Self {
        Self::new(GraphSettings::default())
    }
}
