//! Named voice effect presets
//!
//! One table shared by the live preview and the bounce renderer. Lookups
//! never fail: an unknown identifier resolves to `normal`.

use crate::graph::{FilterKind, FilterSettings};

/// Identifier of the neutral preset unknown identifiers resolve to
pub const DEFAULT_EFFECT: &str = "normal";

/// LFO rate used when a preset does not set one
pub const DEFAULT_TREMOLO_RATE: f32 = 10.0;

/// Synthesis parameters of one voice effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetParams {
    /// Filter kind, frequency, Q and gain
    pub filter: FilterSettings,
    /// Delay time in seconds (0 = no audible delay branch)
    pub delay_time: f32,
    /// Feedback gain of the echo loop
    ///
    /// Values of 1 or more make the echo self-reinforcing; they are applied
    /// as given.
    pub feedback: f32,
    /// Tremolo LFO rate in Hz
    pub tremolo_rate: f32,
    /// Tremolo depth (intrinsic value of the tremolo gain)
    pub tremolo_depth: f32,
}

impl PresetParams {
    const fn filter(kind: FilterKind, frequency: f32, q: f32) -> Self {
        Self {
            filter: FilterSettings::new(kind, frequency, q, 0.0),
            delay_time: 0.0,
            feedback: 0.0,
            tremolo_rate: DEFAULT_TREMOLO_RATE,
            tremolo_depth: 0.0,
        }
    }

    const fn gain(mut self, gain_db: f32) -> Self {
        self.filter.gain_db = gain_db;
        self
    }

    const fn echo(mut self, delay_time: f32, feedback: f32) -> Self {
        self.delay_time = delay_time;
        self.feedback = feedback;
        self
    }

    const fn tremolo(mut self, rate: f32, depth: f32) -> Self {
        self.tremolo_rate = rate;
        self.tremolo_depth = depth;
        self
    }
}

impl Default for PresetParams {
    fn default() -> Self {
        NORMAL
    }
}

use FilterKind::{Allpass, Bandpass, Highpass, Lowpass};

const NORMAL: PresetParams = PresetParams::filter(Allpass, 1000.0, 1.0);

/// Palette in display order
const PRESETS: &[(&str, PresetParams)] = &[
    (DEFAULT_EFFECT, NORMAL),
    ("phone", PresetParams::filter(Highpass, 2000.0, 8.0)),
    ("cave", PresetParams::filter(Lowpass, 600.0, 6.0).echo(0.45, 0.7)),
    (
        "underwater",
        PresetParams::filter(Lowpass, 400.0, 2.0).echo(0.15, 0.3).tremolo(5.0, 0.2),
    ),
    ("robot", PresetParams::filter(Highpass, 1200.0, 1.0).tremolo(30.0, 1.0)),
    (
        "ghost",
        PresetParams::filter(Bandpass, 500.0, 9.0).echo(0.5, 0.8).tremolo(3.0, 0.4),
    ),
    ("child", PresetParams::filter(Allpass, 1500.0, 2.0).tremolo(15.0, 0.3)),
    (
        "old",
        PresetParams::filter(Lowpass, 700.0, 3.0).echo(0.2, 0.5).tremolo(2.0, 0.2),
    ),
    ("echo", PresetParams::filter(Allpass, 1000.0, 1.0).echo(0.6, 0.75)),
    ("protoss", PresetParams::filter(Allpass, 1100.0, 6.0).echo(0.09, 0.42)),
    (
        "whisper",
        PresetParams::filter(Bandpass, 1800.0, 4.0)
            .gain(6.0)
            .echo(0.03, 0.2)
            .tremolo(4.0, 0.15),
    ),
    (
        "radio",
        PresetParams::filter(Bandpass, 1800.0, 2.0).gain(8.0).tremolo(6.5, 0.4),
    ),
    (
        "megaphone",
        PresetParams::filter(Highpass, 900.0, 5.0).gain(15.0).echo(0.05, 0.35),
    ),
    (
        "demon",
        PresetParams::filter(Lowpass, 800.0, 3.0)
            .gain(12.0)
            .echo(0.07, 0.6)
            .tremolo(120.0, 0.5),
    ),
    (
        "angel",
        PresetParams::filter(Highpass, 800.0, 5.0)
            .gain(10.0)
            .echo(0.35, 0.65)
            .tremolo(1.5, 0.2),
    ),
    (
        "vader",
        PresetParams::filter(Bandpass, 400.0, 8.0)
            .gain(15.0)
            .echo(0.04, 0.4)
            .tremolo(80.0, 0.3),
    ),
    (
        "giant",
        PresetParams::filter(Lowpass, 300.0, 4.0).gain(18.0).echo(0.6, 0.7),
    ),
    (
        "tiny",
        PresetParams::filter(Highpass, 2200.0, 6.0)
            .gain(8.0)
            .echo(0.02, 0.3)
            .tremolo(8.0, 0.4),
    ),
    (
        "possessed",
        PresetParams::filter(Bandpass, 600.0, 5.0)
            .gain(12.0)
            .echo(0.07, 0.7)
            .tremolo(100.0, 0.6),
    ),
    (
        "horror",
        PresetParams::filter(Bandpass, 620.0, 14.0)
            .gain(15.0)
            .echo(0.38, 0.78)
            .tremolo(2.8, 0.6),
    ),
    (
        "helium",
        PresetParams::filter(Highpass, 2900.0, 7.0)
            .gain(10.0)
            .echo(0.015, 0.18)
            .tremolo(12.0, 0.2),
    ),
    (
        "timewarp",
        PresetParams::filter(Lowpass, 580.0, 9.0)
            .gain(13.0)
            .echo(0.42, 0.89)
            .tremolo(0.25, 0.5),
    ),
    (
        "glitch",
        PresetParams::filter(Bandpass, 1300.0, 22.0)
            .gain(11.0)
            .echo(0.008, 0.35)
            .tremolo(280.0, 0.92),
    ),
    (
        "choir",
        PresetParams::filter(Allpass, 1600.0, 5.0)
            .gain(15.0)
            .echo(0.28, 0.72)
            .tremolo(1.1, 0.28),
    ),
    (
        "hyperpop",
        PresetParams::filter(Highpass, 3200.0, 14.0)
            .gain(19.0)
            .echo(0.018, 0.42)
            .tremolo(220.0, 0.7),
    ),
    (
        "vaporwave",
        PresetParams::filter(Lowpass, 3400.0, 2.0)
            .gain(11.0)
            .echo(0.38, 0.78)
            .tremolo(0.35, 0.65),
    ),
    (
        "darksynth",
        PresetParams::filter(Bandpass, 950.0, 11.0)
            .gain(17.0)
            .echo(0.24, 0.70)
            .tremolo(130.0, 0.55),
    ),
    (
        "lofi-girl",
        PresetParams::filter(Lowpass, 4200.0, 1.8)
            .gain(9.0)
            .echo(0.45, 0.62)
            .tremolo(0.12, 0.35),
    ),
    (
        "bitcrush-voice",
        PresetParams::filter(Bandpass, 2200.0, 28.0)
            .gain(15.0)
            .echo(0.004, 0.25)
            .tremolo(420.0, 0.96),
    ),
    (
        "portal",
        PresetParams::filter(Allpass, 750.0, 18.0)
            .gain(22.0)
            .echo(0.65, 0.94)
            .tremolo(0.7, 0.8),
    ),
    (
        "neoncity",
        PresetParams::filter(Bandpass, 1150.0, 9.0)
            .gain(19.0)
            .echo(0.52, 0.80)
            .tremolo(2.8, 0.45),
    ),
    (
        "ghost-in-machine",
        PresetParams::filter(Bandpass, 780.0, 20.0)
            .gain(16.0)
            .echo(0.09, 0.58)
            .tremolo(190.0, 0.88),
    ),
];

/// Parameters of the named effect, `normal` for unknown identifiers
pub fn lookup(effect_id: &str) -> PresetParams {
    PRESETS
        .iter()
        .find(|(id, _)| *id == effect_id)
        .map_or(NORMAL, |(_, params)| *params)
}

/// Whether the identifier names a preset
pub fn is_known(effect_id: &str) -> bool {
    PRESETS.iter().any(|(id, _)| *id == effect_id)
}

/// The identifier an effect resolves to (`normal` for unknown identifiers)
pub fn canonical_id(effect_id: &str) -> &'static str {
    PRESETS
        .iter()
        .find(|(id, _)| *id == effect_id)
        .map_or(DEFAULT_EFFECT, |(id, _)| *id)
}

/// Every effect identifier, in display order
pub fn palette() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(id, _)| *id)
}
