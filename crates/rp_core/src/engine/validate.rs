use crate::models::{MatchSettings, Period, Roster};
use serde::Serialize;

/// Why a toggle was refused. Refusals are decisions, not errors: the plan is
/// fine, the request just does not fit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The period already has a full field.
    CapacityExceeded,
    /// The player is marked unavailable for this match.
    PlayerUnavailable,
}

/// Verdict on a requested toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleDecision {
    Allowed,
    Denied(DenyReason),
}

impl ToggleDecision {
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, ToggleDecision::Allowed)
    }
}

/// Capacity gate for one toggle.
///
/// Switching off is always allowed, as is re-applying the current state.
/// Switching on is allowed only while the period has room left, counting
/// available on-field players against the configured field size.
pub fn validate_toggle(
    roster: &Roster,
    settings: &MatchSettings,
    period: Period,
    previous: bool,
    requested: bool,
) -> ToggleDecision {
    if previous == requested || !requested {
        return ToggleDecision::Allowed;
    }
    if roster.on_field_count(period) >= settings.on_field_count {
        return ToggleDecision::Denied(DenyReason::CapacityExceeded);
    }
    ToggleDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generate_periods;

    fn full_first_period() -> (Roster, Vec<Period>, MatchSettings) {
        let settings = MatchSettings::default();
        let periods = generate_periods(settings.total_minutes).unwrap();
        let mut roster = Roster::starter(&periods);
        let names: Vec<String> = roster.players().iter().take(9).map(|p| p.name.clone()).collect();
        for name in &names {
            roster.player_mut(name).unwrap().set_on(periods[0], true).unwrap();
        }
        (roster, periods, settings)
    }

    #[test]
    fn test_switching_on_with_room_is_allowed() {
        let settings = MatchSettings::default();
        let periods = generate_periods(settings.total_minutes).unwrap();
        let roster = Roster::starter(&periods);

        let decision = validate_toggle(&roster, &settings, periods[0], false, true);
        assert_eq!(decision, ToggleDecision::Allowed);
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_switching_on_at_capacity_is_denied() {
        let (roster, periods, settings) = full_first_period();
        assert_eq!(roster.on_field_count(periods[0]), 9);

        let decision = validate_toggle(&roster, &settings, periods[0], false, true);
        assert_eq!(decision, ToggleDecision::Denied(DenyReason::CapacityExceeded));
        assert!(!decision.is_allowed());
    }

    #[test]
    fn test_switching_off_ignores_capacity() {
        let (roster, periods, settings) = full_first_period();

        let decision = validate_toggle(&roster, &settings, periods[0], true, false);
        assert_eq!(decision, ToggleDecision::Allowed);
    }

    #[test]
    fn test_noop_at_capacity_is_allowed() {
        let (roster, periods, settings) = full_first_period();

        // Re-applying the on state of a player who is already on must not
        // count them against the headcount a second time.
        let decision = validate_toggle(&roster, &settings, periods[0], true, true);
        assert_eq!(decision, ToggleDecision::Allowed);
    }

    #[test]
    fn test_unavailable_players_free_their_slot() {
        let (mut roster, periods, settings) = full_first_period();
        roster.set_available("Susanne", false).unwrap();

        let decision = validate_toggle(&roster, &settings, periods[0], false, true);
        assert_eq!(decision, ToggleDecision::Allowed);
    }
}
