/// Multi-channel delay line
///
/// Ring buffer per channel with linearly interpolated fractional reads. The
/// effective delay is never shorter than one frame: a delay line is what
/// breaks feedback cycles in the graph, so its output for the current frame
/// must not depend on its input for the same frame.
///
/// Stored samples saturate at `±f32::MAX`. A feedback loop with gain of 1 or
/// more grows until it saturates and then stays at full scale; it never turns
/// into NaN.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffers: Vec<Vec<f32>>,
    write_pos: usize,
    sample_rate: f32,
    max_delay_secs: f32,
    delay_secs: f32,
    delay_frames: f64,
}

impl DelayLine {
    /// Create a delay line able to hold `max_delay_secs` of audio
    pub fn new(channels: usize, sample_rate: u32, max_delay_secs: f32) -> Self {
        let sample_rate = sample_rate as f32;
        let max_delay_secs = max_delay_secs.max(0.0);
        // Two spare frames for interpolation at the maximum delay
        let len = (max_delay_secs * sample_rate).ceil() as usize + 2;

        let mut line = Self {
            buffers: vec![vec![0.0; len]; channels],
            write_pos: 0,
            sample_rate,
            max_delay_secs,
            delay_secs: 0.0,
            delay_frames: 1.0,
        };
        line.set_delay_time(0.0);
        line
    }

    /// Set the delay time in seconds (clamped to the line's capacity)
    pub fn set_delay_time(&mut self, secs: f32) {
        let secs = if secs.is_finite() {
            secs.clamp(0.0, self.max_delay_secs)
        } else {
            0.0
        };
        self.delay_secs = secs;

        let capacity = (self.buffer_len() - 2).max(1) as f64;
        self.delay_frames = f64::from(secs * self.sample_rate).clamp(1.0, capacity);
    }

    /// Configured delay time in seconds
    pub fn delay_time(&self) -> f32 {
        self.delay_secs
    }

    /// Maximum delay time in seconds
    pub fn max_delay_time(&self) -> f32 {
        self.max_delay_secs
    }

    /// Read the delayed sample for `channel` at the current position
    #[inline]
    pub fn read(&self, channel: usize) -> f32 {
        let Some(buffer) = self.buffers.get(channel) else {
            return 0.0;
        };
        let len = buffer.len();

        let position = self.write_pos as f64 - self.delay_frames;
        let position = if position < 0.0 {
            position + len as f64
        } else {
            position
        };

        let index = position.floor() as usize % len;
        let frac = (position - position.floor()) as f32;
        let current = buffer[index];
        let next = buffer[(index + 1) % len];

        if frac == 0.0 {
            return current;
        }
        (current * (1.0 - frac) + next * frac).clamp(f32::MIN, f32::MAX)
    }

    /// Write the input sample for `channel` at the current position
    #[inline]
    pub fn write(&mut self, channel: usize, value: f32) {
        let pos = self.write_pos;
        if let Some(buffer) = self.buffers.get_mut(channel) {
            buffer[pos] = value.clamp(f32::MIN, f32::MAX);
        }
    }

    /// Move to the next frame
    #[inline]
    pub fn advance(&mut self) {
        self.write_pos = (self.write_pos + 1) % self.buffer_len();
    }

    /// Clear stored audio
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(0.0);
        }
        self.write_pos = 0;
    }

    fn buffer_len(&self) -> usize {
        self.buffers.first().map_or(2, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_impulse(line: &mut DelayLine, frames: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(frames);
        for i in 0..frames {
            out.push(line.read(0));
            line.write(0, if i == 0 { 1.0 } else { 0.0 });
            line.advance();
        }
        out
    }

    #[test]
    fn integer_delay_moves_impulse() {
        // 0.25 s at 40 Hz = exactly 10 frames
        let mut line = DelayLine::new(1, 40, 1.0);
        line.set_delay_time(0.25);

        let out = run_impulse(&mut line, 20);
        assert_eq!(out[10], 1.0);
        assert_eq!(out.iter().filter(|&&s| s != 0.0).count(), 1);
    }

    #[test]
    fn zero_delay_is_one_frame() {
        let mut line = DelayLine::new(1, 40, 1.0);
        line.set_delay_time(0.0);

        let out = run_impulse(&mut line, 4);
        assert_eq!(out, vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn delay_is_clamped_to_capacity() {
        let mut line = DelayLine::new(1, 40, 0.5);
        line.set_delay_time(3.0);
        assert_eq!(line.delay_time(), 0.5);

        let out = run_impulse(&mut line, 30);
        assert_eq!(out[20], 1.0);
    }

    #[test]
    fn fractional_delay_interpolates() {
        // 1.5 frames: impulse splits between frames 1 and 2
        let mut line = DelayLine::new(1, 2, 4.0);
        line.set_delay_time(0.75);

        let out = run_impulse(&mut line, 4);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn channels_are_independent() {
        let mut line = DelayLine::new(2, 40, 1.0);
        line.set_delay_time(0.05); // 2 frames

        line.write(0, 1.0);
        line.write(1, -1.0);
        line.advance();
        line.advance();

        assert_eq!(line.read(0), 1.0);
        assert_eq!(line.read(1), -1.0);
    }

    #[test]
    fn non_finite_delay_falls_back_to_zero() {
        let mut line = DelayLine::new(1, 40, 1.0);
        line.set_delay_time(f32::NAN);
        assert_eq!(line.delay_time(), 0.0);
    }

    #[test]
    fn runaway_feedback_saturates_instead_of_going_nan() {
        // 1.5 frames with a feedback gain of 2 overflows f32 within a few hundred frames
        let mut line = DelayLine::new(1, 2, 4.0);
        line.set_delay_time(0.75);

        let mut input = 1.0;
        for _ in 0..2_000 {
            let out = line.read(0);
            assert!(out.is_finite(), "delay output went non-finite");
            line.write(0, input + out * 2.0);
            input = 0.0;
            line.advance();
        }
        assert!(line.read(0).abs() > 1e30);
    }

    #[test]
    fn whole_frame_reads_skip_interpolation() {
        let mut line = DelayLine::new(1, 40, 1.0);
        line.set_delay_time(0.025); // 1 frame

        line.write(0, f32::INFINITY);
        line.advance();
        assert_eq!(line.read(0), f32::MAX);
    }
}
