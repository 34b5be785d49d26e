//! Parameter snapshot of the current effect selection

use super::preset::{self, PresetParams, DEFAULT_EFFECT};
use super::routing::{self, RoutingCategory};

/// Everything the voice graph needs to know about the current selection
///
/// The preset's filter fields may have been edited through the filter
/// controls after selection; delay, feedback and tremolo always come from
/// the preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSnapshot {
    /// Active effect identifier (always a palette entry)
    pub effect: &'static str,
    /// Parameters written into the graph
    pub preset: PresetParams,
    /// Master output gain
    pub master_volume: f32,
}

impl ParameterSnapshot {
    /// Snapshot of a freshly selected effect at unity volume
    ///
    /// Unknown identifiers select `normal`.
    pub fn for_effect(effect_id: &str) -> Self {
        Self {
            effect: preset::canonical_id(effect_id),
            preset: preset::lookup(effect_id),
            master_volume: 1.0,
        }
    }

    /// Same snapshot with a different master volume
    pub fn with_master_volume(mut self, master_volume: f32) -> Self {
        self.master_volume = master_volume;
        self
    }

    /// Routing category of the active effect
    pub fn category(&self) -> RoutingCategory {
        routing::classify(self.effect)
    }
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self::for_effect(DEFAULT_EFFECT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_carries_preset_and_category() {
        let snapshot = ParameterSnapshot::for_effect("robot");
        assert_eq!(snapshot.effect, "robot");
        assert_eq!(snapshot.preset, preset::lookup("robot"));
        assert_eq!(snapshot.category(), RoutingCategory::TremoloOnly);
        assert_eq!(snapshot.master_volume, 1.0);
    }

    #[test]
    fn unknown_effect_snapshots_as_normal() {
        let snapshot = ParameterSnapshot::for_effect("kazoo");
        assert_eq!(snapshot, ParameterSnapshot::default());
        assert_eq!(snapshot.effect, "normal");
    }

    #[test]
    fn master_volume_override() {
        let snapshot = ParameterSnapshot::for_effect("cave").with_master_volume(0.25);
        assert_eq!(snapshot.master_volume, 0.25);
        assert_eq!(snapshot.category(), RoutingCategory::DelayFeedback);
    }
}
