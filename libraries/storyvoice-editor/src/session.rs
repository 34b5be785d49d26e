//! Effect selection state
//!
//! Holds the active effect and the values of the effect controls. The live
//! engine and the bake job both read this snapshot; nothing reads the
//! controls directly.

use storyvoice_audio::effects::{ParameterSnapshot, DEFAULT_EFFECT};
use storyvoice_audio::graph::FilterKind;

/// Active effect plus control overrides for one editor view
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSession {
    snapshot: ParameterSnapshot,
}

impl EffectSession {
    /// Session with `normal` selected
    pub fn new(master_volume: f32) -> Self {
        Self {
            snapshot: ParameterSnapshot::for_effect(DEFAULT_EFFECT).with_master_volume(master_volume),
        }
    }

    /// Select an effect
    ///
    /// Resets the filter controls to the preset's values and keeps the
    /// master volume. Unknown identifiers select `normal`. Selecting the
    /// active effect again yields the same snapshot.
    pub fn select(&mut self, effect_id: &str) -> &ParameterSnapshot {
        let master_volume = self.snapshot.master_volume;
        self.snapshot = ParameterSnapshot::for_effect(effect_id).with_master_volume(master_volume);
        tracing::debug!(effect = self.snapshot.effect, "Selected voice effect");
        &self.snapshot
    }

    /// Identifier of the active effect
    pub fn active_effect(&self) -> &'static str {
        self.snapshot.effect
    }

    /// Current snapshot
    pub fn snapshot(&self) -> &ParameterSnapshot {
        &self.snapshot
    }

    /// Set the filter kind
    pub fn set_filter_kind(&mut self, kind: FilterKind) {
        self.snapshot.preset.filter.kind = kind;
    }

    /// Set the filter frequency; non-positive or non-finite values are ignored
    pub fn set_frequency(&mut self, frequency: f32) -> bool {
        if !frequency.is_finite() || frequency <= 0.0 {
            return false;
        }
        self.snapshot.preset.filter.frequency = frequency;
        true
    }

    /// Set the filter Q; non-finite values are ignored
    pub fn set_q(&mut self, q: f32) -> bool {
        if !q.is_finite() {
            return false;
        }
        self.snapshot.preset.filter.q = q;
        true
    }

    /// Set the filter gain in dB; non-finite values are ignored
    pub fn set_gain(&mut self, gain_db: f32) -> bool {
        if !gain_db.is_finite() {
            return false;
        }
        self.snapshot.preset.filter.gain_db = gain_db;
        true
    }

    /// Set the master volume; negative or non-finite values are ignored
    pub fn set_master_volume(&mut self, volume: f32) -> bool {
        if !volume.is_finite() || volume < 0.0 {
            return false;
        }
        self.snapshot.master_volume = volume;
        true
    }
}

impl Default for EffectSession {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyvoice_audio::effects::lookup;

    #[test]
    fn selection_is_last_write_wins() {
        let mut session = EffectSession::default();
        session.select("cave");
        session.select("robot");
        assert_eq!(session.active_effect(), "robot");
        assert_eq!(session.snapshot().preset, lookup("robot"));
    }

    #[test]
    fn reselection_is_idempotent() {
        let mut session = EffectSession::default();
        let first = *session.select("portal");
        let second = *session.select("portal");
        assert_eq!(first, second);
    }

    #[test]
    fn selection_resets_filter_controls_but_keeps_volume() {
        let mut session = EffectSession::default();
        session.select("cave");
        assert!(session.set_frequency(2_500.0));
        assert!(session.set_master_volume(0.4));

        session.select("cave");
        assert_eq!(session.snapshot().preset.filter.frequency, 600.0);
        assert_eq!(session.snapshot().master_volume, 0.4);
    }

    #[test]
    fn control_edits_override_the_preset() {
        let mut session = EffectSession::default();
        session.select("phone");
        session.set_filter_kind(FilterKind::Peaking);
        assert!(session.set_q(3.0));
        assert!(session.set_gain(-6.0));

        let filter = session.snapshot().preset.filter;
        assert_eq!(filter.kind, FilterKind::Peaking);
        assert_eq!(filter.q, 3.0);
        assert_eq!(filter.gain_db, -6.0);
        assert_eq!(filter.frequency, 2_000.0);
        assert_eq!(session.active_effect(), "phone");
    }

    #[test]
    fn invalid_control_values_are_ignored() {
        let mut session = EffectSession::default();
        assert!(!session.set_frequency(f32::NAN));
        assert!(!session.set_frequency(-10.0));
        assert!(!session.set_q(f32::INFINITY));
        assert!(!session.set_master_volume(-0.1));
        assert_eq!(*session.snapshot(), *EffectSession::default().snapshot());
    }

    #[test]
    fn unknown_effect_selects_normal() {
        let mut session = EffectSession::default();
        session.select("nonexistent");
        assert_eq!(session.active_effect(), "normal");
    }
}
