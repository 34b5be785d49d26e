//! Test signal generation
//!
//! Every generator returns an interleaved `AudioBuffer` with the same signal
//! on all channels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;
use storyvoice_core::{AudioBuffer, AudioFormat, SampleRate};

fn format(sample_rate: u32, channels: u16) -> AudioFormat {
    AudioFormat::new(SampleRate::new(sample_rate), channels, 32)
}

fn frames_for(sample_rate: u32, duration: f32) -> usize {
    (sample_rate as f32 * duration).round() as usize
}

/// Generate a sine wave
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `channels` - Interleaved channel count
/// * `duration` - Duration in seconds
/// * `amplitude` - Peak amplitude
pub fn sine(frequency: f32, sample_rate: u32, channels: u16, duration: f32, amplitude: f32) -> AudioBuffer {
    let frames = frames_for(sample_rate, duration);
    let mut samples = Vec::with_capacity(frames * usize::from(channels));

    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * PI * frequency * t).sin() * amplitude;
        samples.extend(std::iter::repeat(sample).take(usize::from(channels)));
    }

    AudioBuffer::new(samples, format(sample_rate, channels))
}

/// Generate an impulse of `amplitude` at frame 0
pub fn impulse(sample_rate: u32, channels: u16, duration: f32, amplitude: f32) -> AudioBuffer {
    let mut buffer = AudioBuffer::silence(frames_for(sample_rate, duration), format(sample_rate, channels));
    for sample in buffer.samples.iter_mut().take(usize::from(channels)) {
        *sample = amplitude;
    }
    buffer
}

/// Generate a constant (DC) signal
pub fn constant(value: f32, sample_rate: u32, channels: u16, duration: f32) -> AudioBuffer {
    let frames = frames_for(sample_rate, duration);
    AudioBuffer::new(
        vec![value; frames * usize::from(channels)],
        format(sample_rate, channels),
    )
}

/// Generate seeded white noise in [-amplitude, amplitude]
///
/// The same seed always yields the same buffer.
pub fn noise(seed: u64, sample_rate: u32, channels: u16, duration: f32, amplitude: f32) -> AudioBuffer {
    let frames = frames_for(sample_rate, duration);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(frames * usize::from(channels));

    for _ in 0..frames {
        let value = rng.gen_range(-1.0f32..=1.0) * amplitude;
        samples.extend(std::iter::repeat(value).take(usize::from(channels)));
    }

    AudioBuffer::new(samples, format(sample_rate, channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_has_expected_shape() {
        let buffer = sine(440.0, 44_100, 2, 1.0, 0.5);
        assert_eq!(buffer.frames(), 44_100);
        assert_eq!(buffer.channels(), 2);
        assert!(buffer.samples.iter().all(|s| s.abs() <= 0.5));
        assert_eq!(buffer.frame(10).unwrap()[0], buffer.frame(10).unwrap()[1]);
    }

    #[test]
    fn impulse_is_single_frame() {
        let buffer = impulse(100, 3, 1.0, 1.0);
        assert_eq!(&buffer.samples[..3], &[1.0, 1.0, 1.0]);
        assert!(buffer.samples[3..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn noise_is_deterministic_and_bounded() {
        let a = noise(7, 8_000, 1, 0.5, 0.8);
        let b = noise(7, 8_000, 1, 0.5, 0.8);
        assert_eq!(a, b);
        assert!(a.samples.iter().all(|s| s.abs() <= 0.8));
        assert_ne!(a, noise(8, 8_000, 1, 0.5, 0.8));
    }
}
