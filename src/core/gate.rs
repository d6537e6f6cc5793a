//! Coaching eligibility gate: rate limiter in front of the coaching UI
//!
//! A card may show only if coaching is enabled, no snooze is active,
//! and the minimum interval since the last card has elapsed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CoachingSettings;

/// Why the gate said no
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateRefusal {
    Disabled,
    Snoozed,
    TooSoon,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingGate {
    pub settings: CoachingSettings,
    /// ms since epoch; coaching suppressed until then
    pub snoozed_until: Option<i64>,
    /// ms since epoch of the last card shown
    pub last_coached_at: Option<i64>,
}

impl CoachingGate {
    pub fn new(settings: CoachingSettings) -> Self {
        Self {
            settings,
            snoozed_until: None,
            last_coached_at: None,
        }
    }

    /// Gate decision with the refusal reason
    pub fn check(&self, now_ms: i64) -> Result<(), GateRefusal> {
        if !self.settings.enabled {
            return Err(GateRefusal::Disabled);
        }
        if self.snoozed_until.is_some_and(|until| now_ms < until) {
            return Err(GateRefusal::Snoozed);
        }
        let min_gap_ms = i64::from(self.settings.min_seconds_between) * 1000;
        if self.last_coached_at.is_some_and(|last| now_ms.saturating_sub(last) < min_gap_ms) {
            return Err(GateRefusal::TooSoon);
        }
        Ok(())
    }

    pub fn can_coach(&self, now_ms: i64) -> bool {
        match self.check(now_ms) {
            Ok(()) => true,
            Err(refusal) => {
                debug!("coaching gate closed: {:?}", refusal);
                false
            }
        }
    }

    /// Record that a card was shown
    pub fn mark_coached(&mut self, now_ms: i64) {
        self.last_coached_at = Some(now_ms);
    }

    /// User dismissed a card: snooze for the configured cooldown
    pub fn dismiss(&mut self, now_ms: i64) {
        let snooze_ms = i64::from(self.settings.snooze_minutes) * 60_000;
        self.snoozed_until = Some(now_ms.saturating_add(snooze_ms));
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_gate_is_open() {
        let gate = CoachingGate::new(CoachingSettings::default());
        assert!(gate.can_coach(0));
    }

    #[test]
    fn test_min_interval() {
        let mut gate = CoachingGate::new(CoachingSettings::default());
        gate.mark_coached(1_000_000);
        assert_eq!(gate.check(1_000_000 + 44_999), Err(GateRefusal::TooSoon));
        assert!(gate.can_coach(1_000_000 + 45_000));
    }

    #[test]
    fn test_dismiss_snoozes_for_an_hour() {
        let mut gate = CoachingGate::new(CoachingSettings::default());
        gate.dismiss(0);
        assert_eq!(gate.check(59 * 60_000), Err(GateRefusal::Snoozed));
        assert!(gate.can_coach(60 * 60_000));
    }

    #[test]
    fn test_disabled() {
        let mut gate = CoachingGate::new(CoachingSettings::default());
        gate.set_enabled(false);
        assert_eq!(gate.check(0), Err(GateRefusal::Disabled));
    }

    #[test]
    fn test_extreme_clock_values_saturate() {
        let mut gate = CoachingGate::new(CoachingSettings::default());
        gate.dismiss(i64::MAX);
        assert_eq!(gate.snoozed_until, Some(i64::MAX));
        assert_eq!(gate.check(i64::MAX - 1), Err(GateRefusal::Snoozed));

        let mut gate = CoachingGate::new(CoachingSettings::default());
        gate.mark_coached(1_000);
        assert_eq!(gate.check(i64::MIN), Err(GateRefusal::TooSoon));

        gate.mark_coached(i64::MIN);
        assert!(gate.can_coach(i64::MAX));
    }
}
