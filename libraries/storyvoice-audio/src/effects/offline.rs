//! Offline bounce renderer

use super::snapshot::ParameterSnapshot;
use super::voice::{GraphSettings, VoiceGraph};
use crate::decoder::SymphoniaDecoder;
use crate::error::{AudioError, Result};
use crate::wav::encode_wav;
use storyvoice_core::AudioBuffer;
use tracing::instrument;

/// Renders whole buffers through the voice graph, synchronously
///
/// Builds the same [`VoiceGraph`] the live engine uses, so a bounce matches
/// what the preview played for the same snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRenderer {
    settings: GraphSettings,
    decoder: SymphoniaDecoder,
}

impl OfflineRenderer {
    /// Create a renderer
    pub fn new(settings: GraphSettings) -> Self {
        Self {
            settings,
            decoder: SymphoniaDecoder::new(),
        }
    }

    /// Render `buffer` through a fresh graph configured from `snapshot`
    ///
    /// The result has exactly the input's frame count, channel count and
    /// sample rate.
    pub fn render(&self, buffer: &AudioBuffer, snapshot: &ParameterSnapshot) -> Result<AudioBuffer> {
        let channels = buffer.format.channels;
        if channels == 0 {
            return Err(AudioError::InvalidBuffer("Buffer has no channels".to_string()));
        }
        if buffer.sample_rate() == 0 {
            return Err(AudioError::InvalidBuffer("Buffer has no sample rate".to_string()));
        }
        if buffer.samples.len() % usize::from(channels) != 0 {
            return Err(AudioError::InvalidBuffer(format!(
                "{} samples do not divide into {} channels",
                buffer.samples.len(),
                channels
            )));
        }

        let mut voice = VoiceGraph::new(channels, buffer.sample_rate(), self.settings);
        voice.apply(snapshot);

        let mut rendered = vec![0.0; buffer.samples.len()];
        voice.process(&buffer.samples, &mut rendered);

        Ok(AudioBuffer::new(rendered, buffer.format))
    }

    /// Decode an encoded asset, render it and encode the result as WAV
    ///
    /// All-or-nothing: any decode or encode failure returns an error and no
    /// bytes.
    #[instrument(skip(self, bytes, snapshot), fields(effect = snapshot.effect, input_len = bytes.len()))]
    pub fn bounce(
        &self,
        bytes: Vec<u8>,
        extension_hint: Option<&str>,
        snapshot: &ParameterSnapshot,
    ) -> Result<Vec<u8>> {
        let decoded = self.decoder.decode_memory(bytes, extension_hint)?;
        let rendered = self.render(&decoded, snapshot)?;
        let wav = encode_wav(&rendered)?;

        tracing::info!(
            frames = rendered.frames(),
            channels = rendered.channels(),
            sample_rate = rendered.sample_rate(),
            output_len = wav.len(),
            "Bounced voice effect"
        );
        Ok(wav)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyvoice_core::{AudioFormat, SampleRate};

    fn tone(frames: usize, channels: u16) -> AudioBuffer {
        let format = AudioFormat::new(SampleRate::new(8_000), channels, 32);
        let samples = (0..frames * usize::from(channels))
            .map(|i| ((i as f32) * 0.07).sin() * 0.5)
            .collect();
        AudioBuffer::new(samples, format)
    }

    #[test]
    fn render_preserves_shape() {
        let renderer = OfflineRenderer::default();
        let input = tone(1_000, 2);
        let output = renderer
            .render(&input, &ParameterSnapshot::for_effect("vader"))
            .unwrap();

        assert_eq!(output.frames(), 1_000);
        assert_eq!(output.format, input.format);
        assert!(output.samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn render_is_deterministic() {
        let renderer = OfflineRenderer::default();
        let input = tone(2_000, 1);
        let snapshot = ParameterSnapshot::for_effect("glitch");

        let a = renderer.render(&input, &snapshot).unwrap();
        let b = renderer.render(&input, &snapshot).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn master_volume_scales_output() {
        let renderer = OfflineRenderer::default();
        let input = tone(500, 1);
        let full = renderer
            .render(&input, &ParameterSnapshot::for_effect("phone"))
            .unwrap();
        let muted = renderer
            .render(&input, &ParameterSnapshot::for_effect("phone").with_master_volume(0.0))
            .unwrap();

        assert!(full.samples.iter().any(|s| s.abs() > 0.01));
        assert!(muted.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn render_rejects_malformed_buffers() {
        let renderer = OfflineRenderer::default();
        let snapshot = ParameterSnapshot::default();

        let no_channels = AudioBuffer::new(vec![0.0; 4], AudioFormat::new(SampleRate::new(8_000), 0, 32));
        assert!(renderer.render(&no_channels, &snapshot).is_err());

        let no_rate = AudioBuffer::new(vec![0.0; 4], AudioFormat::new(SampleRate::new(0), 1, 32));
        assert!(renderer.render(&no_rate, &snapshot).is_err());
    }

    #[test]
    fn bounce_of_garbage_fails_without_output() {
        let renderer = OfflineRenderer::default();
        let result = renderer.bounce(b"not audio at all".to_vec(), Some("mp3"), &ParameterSnapshot::default());
        assert!(result.is_err());
    }
}
