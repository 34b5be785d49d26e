/// Biquad filter node
///
/// Second-order IIR filter with the eight response kinds a browser's
/// `BiquadFilterNode` offers. Coefficients follow the Audio EQ Cookbook with
/// the same Q conventions: low-pass and high-pass interpret Q in dB, every
/// other kind uses linear Q.
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Filter response kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKind {
    /// Flat magnitude, phase shift around the center frequency
    #[default]
    Allpass,
    /// Passes below frequency, resonant peak controlled by Q (dB)
    Lowpass,
    /// Passes above frequency, resonant peak controlled by Q (dB)
    Highpass,
    /// Passes a band around frequency, width controlled by Q
    Bandpass,
    /// Rejects a band around frequency
    Notch,
    /// Boosts/cuts below frequency by gain
    Lowshelf,
    /// Boosts/cuts above frequency by gain
    Highshelf,
    /// Boosts/cuts around frequency by gain
    Peaking,
}

impl FilterKind {
    /// Every kind, in selector order
    pub const ALL: [FilterKind; 8] = [
        FilterKind::Allpass,
        FilterKind::Lowpass,
        FilterKind::Highpass,
        FilterKind::Bandpass,
        FilterKind::Notch,
        FilterKind::Lowshelf,
        FilterKind::Highshelf,
        FilterKind::Peaking,
    ];

    /// Selector value for this kind (`"lowpass"`, `"allpass"`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Allpass => "allpass",
            FilterKind::Lowpass => "lowpass",
            FilterKind::Highpass => "highpass",
            FilterKind::Bandpass => "bandpass",
            FilterKind::Notch => "notch",
            FilterKind::Lowshelf => "lowshelf",
            FilterKind::Highshelf => "highshelf",
            FilterKind::Peaking => "peaking",
        }
    }

    /// Whether the gain parameter affects this kind's response
    pub fn uses_gain(&self) -> bool {
        matches!(
            self,
            FilterKind::Lowshelf | FilterKind::Highshelf | FilterKind::Peaking
        )
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a selector value names no filter kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter kind: {0}")]
pub struct ParseFilterKindError(pub String);

impl FromStr for FilterKind {
    type Err = ParseFilterKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseFilterKindError(s.to_string()))
    }
}

/// Filter parameters as exposed by the filter controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    /// Response kind
    pub kind: FilterKind,
    /// Center/cutoff frequency in Hz
    ///
    /// Clamped to 45% of the sample rate when coefficients are computed, so at
    /// 8 kHz anything above 3600 Hz runs at 3600 Hz.
    pub frequency: f32,
    /// Resonance (dB for low/high-pass, linear otherwise)
    pub q: f32,
    /// Shelf/peak gain in dB
    pub gain_db: f32,
}

impl FilterSettings {
    /// Create filter settings
    pub const fn new(kind: FilterKind, frequency: f32, q: f32, gain_db: f32) -> Self {
        Self {
            kind,
            frequency,
            q,
            gain_db,
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self::new(FilterKind::Allpass, 1000.0, 1.0, 0.0)
    }
}

/// Normalized coefficients (a0 divided out)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Coefficients {
    const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    fn compute(settings: &FilterSettings, sample_rate: f32) -> Self {
        // Invalid sample rate would divide by zero below
        if sample_rate < 1.0 {
            return Self::IDENTITY;
        }

        let sample_rate = f64::from(sample_rate);
        // Clamp to 45% of sample rate to keep clear of Nyquist instability
        let frequency = f64::from(settings.frequency).clamp(1.0, sample_rate * 0.45);
        let q = f64::from(settings.q);
        let a = 10.0_f64.powf(f64::from(settings.gain_db) / 40.0);

        let omega = 2.0 * std::f64::consts::PI * frequency / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();

        let alpha_q = sin_omega / (2.0 * q.max(1e-4));
        let alpha_q_db = sin_omega / (2.0 * 10.0_f64.powf(q / 20.0));
        // Shelf slope fixed at 1
        let alpha_s = sin_omega / 2.0 * std::f64::consts::SQRT_2;
        let beta = 2.0 * a.sqrt() * alpha_s;

        let (b0, b1, b2, a0, a1, a2) = match settings.kind {
            FilterKind::Lowpass => (
                (1.0 - cos_omega) / 2.0,
                1.0 - cos_omega,
                (1.0 - cos_omega) / 2.0,
                1.0 + alpha_q_db,
                -2.0 * cos_omega,
                1.0 - alpha_q_db,
            ),
            FilterKind::Highpass => (
                (1.0 + cos_omega) / 2.0,
                -(1.0 + cos_omega),
                (1.0 + cos_omega) / 2.0,
                1.0 + alpha_q_db,
                -2.0 * cos_omega,
                1.0 - alpha_q_db,
            ),
            FilterKind::Bandpass => (
                alpha_q,
                0.0,
                -alpha_q,
                1.0 + alpha_q,
                -2.0 * cos_omega,
                1.0 - alpha_q,
            ),
            FilterKind::Notch => (
                1.0,
                -2.0 * cos_omega,
                1.0,
                1.0 + alpha_q,
                -2.0 * cos_omega,
                1.0 - alpha_q,
            ),
            FilterKind::Allpass => (
                1.0 - alpha_q,
                -2.0 * cos_omega,
                1.0 + alpha_q,
                1.0 + alpha_q,
                -2.0 * cos_omega,
                1.0 - alpha_q,
            ),
            FilterKind::Peaking => (
                1.0 + alpha_q * a,
                -2.0 * cos_omega,
                1.0 - alpha_q * a,
                1.0 + alpha_q / a,
                -2.0 * cos_omega,
                1.0 - alpha_q / a,
            ),
            FilterKind::Lowshelf => (
                a * ((a + 1.0) - (a - 1.0) * cos_omega + beta),
                2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega),
                a * ((a + 1.0) - (a - 1.0) * cos_omega - beta),
                (a + 1.0) + (a - 1.0) * cos_omega + beta,
                -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega),
                (a + 1.0) + (a - 1.0) * cos_omega - beta,
            ),
            FilterKind::Highshelf => (
                a * ((a + 1.0) + (a - 1.0) * cos_omega + beta),
                -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega),
                a * ((a + 1.0) + (a - 1.0) * cos_omega - beta),
                (a + 1.0) - (a - 1.0) * cos_omega + beta,
                2.0 * ((a - 1.0) - (a + 1.0) * cos_omega),
                (a + 1.0) - (a - 1.0) * cos_omega - beta,
            ),
        };

        Self {
            b0: (b0 / a0) as f32,
            b1: (b1 / a0) as f32,
            b2: (b2 / a0) as f32,
            a1: (a1 / a0) as f32,
            a2: (a2 / a0) as f32,
        }
    }
}

/// Per-channel filter history
#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

/// Multi-channel biquad filter
///
/// Parameter writes replace the coefficients immediately and keep the
/// per-channel history, so a preset switch does not restart the filter from
/// silence.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    settings: FilterSettings,
    sample_rate: f32,
    coefficients: Coefficients,
    state: Vec<ChannelState>,
}

impl BiquadFilter {
    /// Create a filter for `channels` channels with default (all-pass) settings
    pub fn new(channels: usize, sample_rate: u32) -> Self {
        let settings = FilterSettings::default();
        let sample_rate = sample_rate as f32;
        Self {
            settings,
            sample_rate,
            coefficients: Coefficients::compute(&settings, sample_rate),
            state: vec![ChannelState::default(); channels],
        }
    }

    /// Current settings
    pub fn settings(&self) -> FilterSettings {
        self.settings
    }

    /// Write new settings
    pub fn set(&mut self, settings: FilterSettings) {
        if settings != self.settings {
            self.settings = settings;
            self.coefficients = Coefficients::compute(&settings, self.sample_rate);
        }
    }

    /// Filter one sample of one channel
    #[inline]
    pub fn process(&mut self, channel: usize, input: f32) -> f32 {
        let c = self.coefficients;
        let Some(state) = self.state.get_mut(channel) else {
            return input;
        };

        let mut output =
            c.b0 * input + c.b1 * state.x1 + c.b2 * state.x2 - c.a1 * state.y1 - c.a2 * state.y2;

        // Flush denormal numbers to zero to prevent CPU performance issues
        if output.abs() < 1e-15 {
            output = 0.0;
        }

        state.x2 = state.x1;
        state.x1 = input;
        state.y2 = state.y1;
        state.y1 = output;

        output
    }

    /// Clear filter history
    pub fn reset(&mut self) {
        self.state.fill(ChannelState::default());
    }

    /// Magnitude response at `frequency` Hz (linear)
    pub fn magnitude_response(&self, frequency: f32) -> f32 {
        let c = self.coefficients;
        let omega = 2.0 * std::f64::consts::PI * f64::from(frequency) / f64::from(self.sample_rate);
        let (cos1, sin1) = (omega.cos(), omega.sin());
        let (cos2, sin2) = ((2.0 * omega).cos(), (2.0 * omega).sin());

        let num_re = f64::from(c.b0) + f64::from(c.b1) * cos1 + f64::from(c.b2) * cos2;
        let num_im = -(f64::from(c.b1) * sin1 + f64::from(c.b2) * sin2);
        let den_re = 1.0 + f64::from(c.a1) * cos1 + f64::from(c.a2) * cos2;
        let den_im = -(f64::from(c.a1) * sin1 + f64::from(c.a2) * sin2);

        let num = (num_re * num_re + num_im * num_im).sqrt();
        let den = (den_re * den_re + den_im * den_im).sqrt();
        (num / den) as f32
    }
}
