//! Routing category classification

/// Which processing branches an effect wires between filter and master
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingCategory {
    /// filter -> master
    PlainFilter,
    /// Dry filter path plus a feedback echo through the delay
    DelayFeedback,
    /// filter -> tremolo -> master, no dry path
    TremoloOnly,
    /// Dry path plus echo, optionally with the tremolo branch
    DelayPlusTremolo {
        /// Filter output also runs through the tremolo branch
        tremolo: bool,
        /// Echo tails are fed into the tremolo branch as well
        tremolo_taps_delay: bool,
    },
}

impl RoutingCategory {
    /// Whether the delay line is audible
    pub fn uses_delay(&self) -> bool {
        matches!(
            self,
            RoutingCategory::DelayFeedback | RoutingCategory::DelayPlusTremolo { .. }
        )
    }

    /// Whether the tremolo gain is on a signal path
    pub fn uses_tremolo(&self) -> bool {
        match self {
            RoutingCategory::TremoloOnly => true,
            RoutingCategory::DelayPlusTremolo { tremolo, .. } => *tremolo,
            _ => false,
        }
    }
}

const fn delay_and_tremolo(tremolo: bool, tremolo_taps_delay: bool) -> RoutingCategory {
    RoutingCategory::DelayPlusTremolo {
        tremolo,
        tremolo_taps_delay,
    }
}

/// Routing category of an effect identifier
///
/// Pure and total; identifiers with no special routing (including unknown
/// ones) are `PlainFilter`.
pub fn classify(effect_id: &str) -> RoutingCategory {
    match effect_id {
        "cave" | "echo" => RoutingCategory::DelayFeedback,
        "robot" => RoutingCategory::TremoloOnly,
        "angel" | "giant" | "tiny" | "megaphone" | "protoss" | "helium" => {
            delay_and_tremolo(false, false)
        }
        "radio" | "darksynth" | "lofi-girl" | "neoncity" | "ghost-in-machine" => {
            delay_and_tremolo(true, false)
        }
        "demon" | "vader" | "possessed" | "horror" | "whisper" | "timewarp" | "glitch"
        | "choir" | "hyperpop" | "vaporwave" | "bitcrush-voice" | "portal" => {
            delay_and_tremolo(true, true)
        }
        _ => RoutingCategory::PlainFilter,
    }
}
