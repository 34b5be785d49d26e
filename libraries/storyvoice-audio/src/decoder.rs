/// Audio decoder implementation using Symphonia
use crate::error::{AudioError, Result};
use std::io::Cursor;
use std::path::Path;
use storyvoice_core::{AudioBuffer, AudioDecoder as AudioDecoderTrait, AudioFormat, SampleRate};
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Audio decoder using Symphonia
///
/// Supports: MP3, FLAC, OGG, WAV, AAC
///
/// Unlike a playback decoder, this one never downmixes or resamples: the
/// returned buffer has the source's channel count and sample rate, which the
/// bounce renderer must preserve.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode a file on disk into an interleaved buffer
    pub fn decode_file(&self, path: &Path) -> Result<AudioBuffer> {
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        Self::decode_stream(mss, &hint)
    }

    /// Decode an in-memory asset into an interleaved buffer
    ///
    /// # Arguments
    /// * `bytes` - Complete encoded asset (e.g. an MP3 fetched from the server)
    /// * `extension_hint` - Optional extension such as `"mp3"` or `"wav"`
    pub fn decode_memory(&self, bytes: Vec<u8>, extension_hint: Option<&str>) -> Result<AudioBuffer> {
        if bytes.is_empty() {
            return Err(AudioError::DecodeError("Empty audio asset".to_string()));
        }

        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension_hint {
            hint.with_extension(ext);
        }

        Self::decode_stream(mss, &hint)
    }

    fn decode_stream(mss: MediaSourceStream, hint: &Hint) -> Result<AudioBuffer> {
        let probed = symphonia::default::get_probe()
            .format(
                hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Symphonia(format!("Failed to probe audio: {}", e)))?;

        let mut format = probed.format;

        // Find the default track
        let track = format
            .default_track()
            .ok_or_else(|| AudioError::DecodeError("No audio tracks found".to_string()))?;

        if track.codec_params.codec == CODEC_TYPE_NULL {
            return Err(AudioError::UnsupportedFormat(
                "Default track has no known codec".to_string(),
            ));
        }

        let track_id = track.id;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Symphonia(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();
        let mut stream_spec: Option<SignalSpec> = None;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(AudioError::Symphonia(format!("Error reading packet: {}", e)));
                }
            };

            // Skip packets that are not for the default track
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(symphonia::core::errors::Error::DecodeError(e)) => {
                    // A corrupt frame is skipped; the rest of the stream is still usable
                    tracing::warn!(error = %e, "Skipping undecodable packet");
                    continue;
                }
                Err(e) => {
                    return Err(AudioError::DecodeError(format!("Decode error: {}", e)));
                }
            };

            let spec = *decoded.spec();
            match stream_spec {
                None => stream_spec = Some(spec),
                Some(first) if first.rate != spec.rate || first.channels != spec.channels => {
                    return Err(AudioError::DecodeError(
                        "Stream changed sample rate or channel layout mid-way".to_string(),
                    ));
                }
                Some(_) => {}
            }

            let mut packet_samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            packet_samples.copy_interleaved_ref(decoded);
            samples.extend_from_slice(packet_samples.samples());
        }

        let spec = stream_spec
            .ok_or_else(|| AudioError::DecodeError("No audio frames decoded".to_string()))?;

        let channels = spec.channels.count() as u16;
        let format = AudioFormat::new(SampleRate::new(spec.rate), channels, 32);

        tracing::debug!(
            frames = samples.len() / usize::from(channels.max(1)),
            channels,
            sample_rate = spec.rate,
            "Decoded audio asset"
        );

        Ok(AudioBuffer::new(samples, format))
    }
}

impl AudioDecoderTrait for SymphoniaDecoder {
    fn decode(&mut self, path: &Path) -> storyvoice_core::Result<AudioBuffer> {
        Ok(self.decode_file(path)?)
    }

    fn decode_bytes(
        &mut self,
        bytes: Vec<u8>,
        extension_hint: Option<&str>,
    ) -> storyvoice_core::Result<AudioBuffer> {
        Ok(self.decode_memory(bytes, extension_hint)?)
    }

    fn supports_format(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            matches!(
                ext.to_lowercase().as_str(),
                "mp3" | "flac" | "ogg" | "wav" | "m4a" | "aac"
            )
        } else {
            false
        }
    }
}
