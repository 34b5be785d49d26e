/// Audio-related types
use serde::{Deserialize, Serialize};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

/// Audio format information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub channels: u16,

    /// Bits per sample
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Create a new audio format
    pub fn new(sample_rate: SampleRate, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    /// Calculate the byte rate (bytes per second)
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.as_hz() * u32::from(self.channels) * u32::from(self.bits_per_sample) / 8
    }
}

/// Audio buffer containing decoded samples
///
/// Samples are stored as f32, nominally in the range [-1.0, 1.0]. Rendered
/// buffers may exceed that range; encoders clamp.
/// Interleaved format: [L, R, L, R, ...] for stereo, one value per frame for mono.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Audio samples (f32, interleaved)
    pub samples: Vec<f32>,

    /// Audio format information
    pub format: AudioFormat,
}

impl AudioBuffer {
    /// Create a new audio buffer
    pub fn new(samples: Vec<f32>, format: AudioFormat) -> Self {
        Self { samples, format }
    }

    /// Create a silent buffer of `frames` frames
    pub fn silence(frames: usize, format: AudioFormat) -> Self {
        Self {
            samples: vec![0.0; frames * format.channels as usize],
            format,
        }
    }

    /// Number of interleaved channels
    pub fn channels(&self) -> usize {
        self.format.channels as usize
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate.as_hz()
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        match self.channels() {
            0 => 0,
            channels => self.samples.len() / channels,
        }
    }

    /// Get the duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate() == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate())
    }

    /// Samples of a single frame (one value per channel)
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        let channels = self.channels();
        let start = index.checked_mul(channels)?;
        self.samples.get(start..start + channels)
    }

    /// Iterate over the samples of one channel
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        let channels = self.channels().max(1);
        self.samples
            .iter()
            .skip(channel)
            .step_by(channels)
            .copied()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }
}
