//! Level measurements for comparing renders

/// Root mean square of the samples
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Largest absolute sample
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Largest absolute difference between two equally long signals
pub fn max_difference(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "signals differ in length");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, f32::max)
}

/// Decode 16-bit little-endian PCM samples following a 44-byte WAV header
pub fn pcm16_samples(wav: &[u8]) -> Vec<i16> {
    wav.get(44..)
        .unwrap_or_default()
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_constant() {
        assert!((calculate_rms(&[0.5; 100]) - 0.5).abs() < 1e-6);
        assert_eq!(calculate_rms(&[]), 0.0);
    }

    #[test]
    fn peak_and_difference() {
        assert_eq!(calculate_peak(&[0.1, -0.7, 0.3]), 0.7);
        assert_eq!(max_difference(&[0.0, 1.0], &[0.5, 1.0]), 0.5);
    }
}
