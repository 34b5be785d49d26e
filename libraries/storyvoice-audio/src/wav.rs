//! Canonical 16-bit PCM WAVE encoding

use crate::error::{AudioError, Result};
use storyvoice_core::AudioBuffer;

/// Size of the RIFF + fmt + data headers
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;
const FORMAT_PCM: u16 = 1;

/// Convert a float sample to 16-bit PCM
///
/// Clamps to [-1, 1], scales by 32767 and truncates toward zero. NaN encodes
/// as silence.
#[inline]
pub fn sample_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Encode an interleaved buffer as a RIFF/WAVE file
///
/// Layout is fixed: `RIFF` header, 16-byte `fmt ` chunk (PCM, 16 bits), then
/// the `data` chunk with little-endian interleaved samples. The result is
/// always `44 + frames * channels * 2` bytes long.
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    let channels = buffer.format.channels;
    if channels == 0 {
        return Err(AudioError::InvalidBuffer("Buffer has no channels".to_string()));
    }
    if buffer.samples.len() % usize::from(channels) != 0 {
        return Err(AudioError::InvalidBuffer(format!(
            "{} samples do not divide into {} channels",
            buffer.samples.len(),
            channels
        )));
    }

    let sample_rate = buffer.sample_rate();
    let block_align = channels
        .checked_mul(BYTES_PER_SAMPLE as u16)
        .ok_or_else(|| AudioError::InvalidBuffer(format!("Too many channels: {}", channels)))?;
    let byte_rate = sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| AudioError::InvalidBuffer(format!("Sample rate too high: {}", sample_rate)))?;

    let data_len = buffer
        .samples
        .len()
        .checked_mul(BYTES_PER_SAMPLE)
        .and_then(|len| u32::try_from(len).ok())
        .filter(|len| len.checked_add(36).is_some())
        .ok_or_else(|| AudioError::InvalidBuffer("Audio too long for a WAV file".to_string()))?;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for &sample in &buffer.samples {
        out.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyvoice_core::{AudioFormat, SampleRate};

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn header_fields() {
        let format = AudioFormat::new(SampleRate::new(22_050), 2, 32);
        let buffer = AudioBuffer::silence(10, format);
        let wav = encode_wav(&buffer).unwrap();

        assert_eq!(wav.len(), 44 + 10 * 2 * 2);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 36 + 40);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 16), 16);
        assert_eq!(u16_at(&wav, 20), 1);
        assert_eq!(u16_at(&wav, 22), 2);
        assert_eq!(u32_at(&wav, 24), 22_050);
        assert_eq!(u32_at(&wav, 28), 22_050 * 4);
        assert_eq!(u16_at(&wav, 32), 4);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 40);
    }

    #[test]
    fn sample_conversion() {
        assert_eq!(sample_to_i16(1.5), 32767);
        assert_eq!(sample_to_i16(1.0), 32767);
        assert_eq!(sample_to_i16(-1.0), -32767);
        assert_eq!(sample_to_i16(-7.0), -32767);
        assert_eq!(sample_to_i16(0.0), 0);
        assert_eq!(sample_to_i16(0.5), 16383);
        assert_eq!(sample_to_i16(-0.5), -16383);
        assert_eq!(sample_to_i16(f32::NAN), 0);
        assert_eq!(sample_to_i16(f32::INFINITY), 32767);
    }

    #[test]
    fn samples_are_interleaved_little_endian() {
        let format = AudioFormat::new(SampleRate::CD_QUALITY, 2, 32);
        let buffer = AudioBuffer::new(vec![1.5, -1.5, 0.0, 0.5], format);
        let wav = encode_wav(&buffer).unwrap();

        let samples: Vec<i16> = wav[44..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, vec![32767, -32767, 0, 16383]);
    }

    #[test]
    fn empty_buffer_is_header_only() {
        let format = AudioFormat::new(SampleRate::CD_QUALITY, 1, 32);
        let wav = encode_wav(&AudioBuffer::new(Vec::new(), format)).unwrap();
        assert_eq!(wav.len(), 44);
        assert_eq!(u32_at(&wav, 40), 0);
        assert_eq!(u32_at(&wav, 4), 36);
    }

    #[test]
    fn rejects_malformed_buffers() {
        let no_channels = AudioBuffer::new(vec![0.0; 4], AudioFormat::new(SampleRate::CD_QUALITY, 0, 32));
        assert!(matches!(encode_wav(&no_channels), Err(AudioError::InvalidBuffer(_))));

        let ragged = AudioBuffer::new(vec![0.0; 3], AudioFormat::new(SampleRate::CD_QUALITY, 2, 32));
        assert!(matches!(encode_wav(&ragged), Err(AudioError::InvalidBuffer(_))));
    }
}
