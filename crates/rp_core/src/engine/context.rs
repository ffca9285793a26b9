use super::metrics::{plan_totals, recompute_metrics, PlanTotals};
use super::propagate::{propagate_from, PropagationReport};
use super::report::{summarize, PeriodSummary};
use super::validate::{validate_toggle, DenyReason, ToggleDecision};
use crate::error::{PlanError, Result};
use crate::models::{generate_periods, MatchSettings, Period, PlayerEntry, Roster};

/// Full result of one toggle request: the verdict, what propagation did, and
/// the position the player covers when they were put on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub decision: ToggleDecision,
    /// Present only when the toggle was applied and propagation ran.
    pub propagation: Option<PropagationReport>,
    /// The player's active position, echoed when the request put them on.
    pub active_position: Option<String>,
}

impl ToggleOutcome {
    fn denied(reason: DenyReason) -> Self {
        Self {
            decision: ToggleDecision::Denied(reason),
            propagation: None,
            active_position: None,
        }
    }
}

/// One match plan: settings, the period schedule derived from them, and the
/// roster with its assignment matrix.
///
/// All mutation goes through methods so the schedule always matches the
/// settings and derived metrics are never stale.
#[derive(Debug, Clone)]
pub struct MatchContext {
    settings: MatchSettings,
    periods: Vec<Period>,
    roster: Roster,
}

impl MatchContext {
    /// Empty roster, schedule derived from `settings`.
    pub fn new(settings: MatchSettings) -> Result<Self> {
        settings.validate()?;
        let periods = generate_periods(settings.total_minutes)?;
        Ok(Self {
            settings,
            periods,
            roster: Roster::new(),
        })
    }

    /// Fresh plan with the usual squad already entered.
    pub fn with_starter_roster(settings: MatchSettings) -> Result<Self> {
        let mut ctx = Self::new(settings)?;
        ctx.roster = Roster::starter(&ctx.periods);
        ctx.recompute_metrics();
        Ok(ctx)
    }

    /// Rebuilds a context from stored parts. The period list must be the one
    /// the settings produce; anything else means the parts drifted apart in
    /// storage.
    pub fn from_parts(settings: MatchSettings, periods: Vec<Period>, roster: Roster) -> Result<Self> {
        settings.validate()?;
        let expected = generate_periods(settings.total_minutes)?;
        if periods != expected {
            return Err(PlanError::InconsistentState(
                "period list does not match the configured duration".to_string(),
            ));
        }
        let mut ctx = Self {
            settings,
            periods,
            roster,
        };
        ctx.recompute_metrics();
        Ok(ctx)
    }

    #[inline]
    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    #[inline]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    #[inline]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Resolves a period label like "15-25" against the current schedule.
    pub fn period_index(&self, label: &str) -> Result<usize> {
        let period: Period = label.parse()?;
        self.periods
            .iter()
            .position(|p| *p == period)
            .ok_or_else(|| PlanError::UnknownPeriod(label.to_string()))
    }

    /// Requests an on-field change for one player in one period.
    ///
    /// Re-applying the current state is a quiet success with no propagation.
    /// Unavailable players and full periods produce a denial, never an
    /// error; the plan is untouched in both cases. An applied change runs
    /// forward propagation and refreshes the metrics, even if propagation
    /// fails partway through.
    pub fn toggle(&mut self, player: &str, period_label: &str, on: bool) -> Result<ToggleOutcome> {
        let idx = self.period_index(period_label)?;
        let period = self.periods[idx];
        let entry = self.roster.player(player)?;
        let previous = entry.is_on(period);
        let available = entry.available;
        let active_position = entry.active_position.clone();

        if previous == on {
            return Ok(ToggleOutcome {
                decision: ToggleDecision::Allowed,
                propagation: None,
                active_position: on.then_some(active_position),
            });
        }
        if !available {
            log::info!("denied toggle for {player} in {period}: unavailable");
            return Ok(ToggleOutcome::denied(DenyReason::PlayerUnavailable));
        }
        let decision = validate_toggle(&self.roster, &self.settings, period, previous, on);
        if let ToggleDecision::Denied(reason) = decision {
            log::info!("denied toggle for {player} in {period}: {reason:?}");
            return Ok(ToggleOutcome::denied(reason));
        }

        self.roster.player_mut(player)?.set_on(period, on)?;
        let propagated = propagate_from(&mut self.roster, &self.periods, &self.settings, player, idx);
        recompute_metrics(&mut self.roster, &self.periods, &self.settings);
        let propagation = propagated?;
        log::info!(
            "set {player} {} in {period}, {} follow-on periods",
            if on { "on" } else { "off" },
            propagation.applied.len()
        );
        Ok(ToggleOutcome {
            decision: ToggleDecision::Allowed,
            propagation: Some(propagation),
            active_position: on.then_some(active_position),
        })
    }

    /// Changes the match length. The schedule is rebuilt and every
    /// assignment is cleared, since old periods have no meaning under the
    /// new clock.
    pub fn set_total_minutes(&mut self, minutes: u32) -> Result<()> {
        self.apply_settings(MatchSettings {
            total_minutes: minutes,
            ..self.settings
        })
    }

    /// Changes the field size. Assignments stay; future validation and
    /// targets use the new capacity.
    pub fn set_on_field_count(&mut self, count: usize) -> Result<()> {
        self.apply_settings(MatchSettings {
            on_field_count: count,
            ..self.settings
        })
    }

    /// Changes duration and field size together. The merged settings are
    /// validated as one, so a request with any bad value leaves the plan
    /// exactly as it was.
    pub fn configure(
        &mut self,
        total_minutes: Option<u32>,
        on_field_count: Option<usize>,
    ) -> Result<()> {
        self.apply_settings(MatchSettings {
            total_minutes: total_minutes.unwrap_or(self.settings.total_minutes),
            on_field_count: on_field_count.unwrap_or(self.settings.on_field_count),
        })
    }

    fn apply_settings(&mut self, next: MatchSettings) -> Result<()> {
        next.validate()?;
        let reschedule = next.total_minutes != self.settings.total_minutes;
        self.settings = next;
        if reschedule {
            self.periods = generate_periods(next.total_minutes)?;
            self.roster.regenerate_coverage(&self.periods);
            log::info!(
                "rescheduled to {} minutes across {} periods, assignments cleared",
                next.total_minutes,
                self.periods.len()
            );
        }
        self.recompute_metrics();
        Ok(())
    }

    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        positions: Vec<String>,
        active: Option<String>,
    ) -> Result<()> {
        let name = name.into();
        self.roster.add_player(name.clone(), positions, active, &self.periods)?;
        self.recompute_metrics();
        log::info!("added {name} to the roster");
        Ok(())
    }

    pub fn remove_player(&mut self, name: &str) -> Result<PlayerEntry> {
        let entry = self.roster.remove_player(name)?;
        self.recompute_metrics();
        log::info!("removed {name} from the roster");
        Ok(entry)
    }

    pub fn set_available(&mut self, name: &str, available: bool) -> Result<()> {
        self.roster.set_available(name, available)?;
        self.recompute_metrics();
        log::info!("marked {name} {}", if available { "available" } else { "unavailable" });
        Ok(())
    }

    pub fn set_active_position(&mut self, name: &str, label: &str) -> Result<()> {
        self.roster.set_active_position(name, label)
    }

    pub fn add_eligible_position(&mut self, name: &str, label: impl Into<String>) -> Result<bool> {
        self.roster.add_eligible_position(name, label)
    }

    /// Overrides the position shown for one player in one period.
    pub fn set_position_at(&mut self, name: &str, period_label: &str, position: impl Into<String>) -> Result<()> {
        let idx = self.period_index(period_label)?;
        let period = self.periods[idx];
        self.roster.set_position_at(name, period, position)
    }

    pub fn summarize(&self) -> Vec<PeriodSummary> {
        summarize(&self.roster, &self.periods)
    }

    pub fn plan_totals(&self) -> PlanTotals {
        plan_totals(&self.roster, &self.periods, &self.settings)
    }

    pub fn recompute_metrics(&mut self) {
        recompute_metrics(&mut self.roster, &self.periods, &self.settings);
    }
}

impl Default for MatchContext {
    fn default() -> Self {
        // Default settings always pass validation.
        Self::new(MatchSettings::default()).expect("default settings are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_context_is_ready_to_plan() {
        let ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        assert_eq!(ctx.periods().len(), 8);
        assert_eq!(ctx.roster().len(), 13);
        assert_eq!(ctx.roster().player("Karen").unwrap().metrics.target_minutes, 55);
    }

    #[test]
    fn test_toggle_applies_propagates_and_recomputes() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();

        let outcome = ctx.toggle("Karen", "15-25", true).unwrap();
        assert_eq!(outcome.decision, ToggleDecision::Allowed);
        assert_eq!(outcome.active_position.as_deref(), Some("Striker"));
        let propagation = outcome.propagation.unwrap();
        assert_eq!(propagation.applied.len(), 2);

        let karen = ctx.roster().player("Karen").unwrap();
        assert!(karen.is_on(ctx.periods()[3]));
        assert!(!karen.is_on(ctx.periods()[4]));
        assert_eq!(karen.metrics.total_minutes, 25);
        assert_eq!(karen.metrics.difference, 25 - 55);
    }

    #[test]
    fn test_denied_toggle_leaves_the_plan_unchanged() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        let nine: Vec<String> = ctx.roster().players().iter().take(9).map(|p| p.name.clone()).collect();
        for name in &nine {
            assert!(ctx.toggle(name, "0-15", true).unwrap().decision.is_allowed());
        }
        let before = ctx.roster().player("Lilly").unwrap().clone();

        let outcome = ctx.toggle("Lilly", "0-15", true).unwrap();
        assert_eq!(
            outcome.decision,
            ToggleDecision::Denied(DenyReason::CapacityExceeded)
        );
        assert_eq!(outcome.propagation, None);

        let after = ctx.roster().player("Lilly").unwrap();
        assert_eq!(after.assignment, before.assignment);
        assert_eq!(after.metrics, before.metrics);
    }

    #[test]
    fn test_noop_toggle_is_quietly_allowed() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        ctx.toggle("Karen", "0-15", true).unwrap();
        let before = ctx.roster().player("Karen").unwrap().clone();

        let outcome = ctx.toggle("Karen", "0-15", true).unwrap();
        assert_eq!(outcome.decision, ToggleDecision::Allowed);
        assert_eq!(outcome.propagation, None);
        assert_eq!(ctx.roster().player("Karen").unwrap().assignment, before.assignment);
    }

    #[test]
    fn test_unavailable_player_toggle_is_denied_not_an_error() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        ctx.set_available("Tuva", false).unwrap();

        let outcome = ctx.toggle("Tuva", "0-15", true).unwrap();
        assert_eq!(
            outcome.decision,
            ToggleDecision::Denied(DenyReason::PlayerUnavailable)
        );
        assert!(!ctx.roster().player("Tuva").unwrap().is_on(ctx.periods()[0]));
    }

    #[test]
    fn test_unknown_references_are_errors() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();

        assert!(matches!(
            ctx.toggle("Nobody", "0-15", true),
            Err(PlanError::UnknownPlayer(_))
        ));
        assert!(matches!(
            ctx.toggle("Karen", "5-10", true),
            Err(PlanError::UnknownPeriod(_))
        ));
        assert!(matches!(
            ctx.toggle("Karen", "not-a-period", true),
            Err(PlanError::UnknownPeriod(_))
        ));
    }

    #[test]
    fn test_duration_change_rebuilds_schedule_and_clears_assignments() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        ctx.toggle("Karen", "0-15", true).unwrap();

        ctx.set_total_minutes(90).unwrap();
        assert_eq!(ctx.periods().len(), 9);
        assert_eq!(ctx.periods()[8].to_string(), "85-90");
        let karen = ctx.roster().player("Karen").unwrap();
        assert!(ctx.periods().iter().all(|p| !karen.is_on(*p)));
        // 90 * 9 / 13 rounds to 62.
        assert_eq!(karen.metrics.target_minutes, 62);
    }

    #[test]
    fn test_field_size_change_keeps_assignments() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        ctx.toggle("Karen", "0-15", true).unwrap();

        ctx.set_on_field_count(11).unwrap();
        let karen = ctx.roster().player("Karen").unwrap();
        assert!(karen.is_on(ctx.periods()[0]));
        // 80 * 11 / 13 rounds to 68.
        assert_eq!(karen.metrics.target_minutes, 68);
    }

    #[test]
    fn test_configure_applies_both_values_or_neither() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        ctx.toggle("Karen", "0-15", true).unwrap();

        assert!(matches!(
            ctx.configure(Some(90), Some(12)),
            Err(PlanError::InvalidCapacity(12))
        ));
        assert_eq!(ctx.settings().total_minutes, 80);
        assert_eq!(ctx.settings().on_field_count, 9);
        assert_eq!(ctx.periods().len(), 8);
        assert!(ctx.roster().player("Karen").unwrap().is_on(ctx.periods()[0]));

        ctx.configure(Some(90), Some(11)).unwrap();
        assert_eq!(ctx.settings().on_field_count, 11);
        assert_eq!(ctx.periods().len(), 9);
    }

    #[test]
    fn test_invalid_settings_leave_context_untouched() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        ctx.toggle("Karen", "0-15", true).unwrap();

        assert!(matches!(
            ctx.set_total_minutes(200),
            Err(PlanError::InvalidDuration(200))
        ));
        assert!(matches!(
            ctx.set_on_field_count(3),
            Err(PlanError::InvalidCapacity(3))
        ));
        assert_eq!(ctx.periods().len(), 8);
        assert!(ctx.roster().player("Karen").unwrap().is_on(ctx.periods()[0]));
    }

    #[test]
    fn test_roster_changes_move_the_target() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        ctx.remove_player("Lilly").unwrap();
        // 720 / 12 = 60.
        assert_eq!(ctx.roster().player("Karen").unwrap().metrics.target_minutes, 60);

        ctx.add_player("Nora", vec!["Back".to_string()], None).unwrap();
        assert_eq!(ctx.roster().player("Nora").unwrap().metrics.target_minutes, 55);
    }

    #[test]
    fn test_from_parts_rejects_mismatched_schedule() {
        let settings = MatchSettings::default();
        let wrong = generate_periods(60).unwrap();
        let roster = Roster::starter(&wrong);

        assert!(matches!(
            MatchContext::from_parts(settings, wrong, roster),
            Err(PlanError::InconsistentState(_))
        ));
    }

    #[test]
    fn test_set_position_at_validates_the_period() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        ctx.set_position_at("Diyana", "15-25", "Striker").unwrap();
        assert_eq!(
            ctx.roster().player("Diyana").unwrap().position_in(ctx.periods()[1]),
            "Striker"
        );
        assert!(matches!(
            ctx.set_position_at("Diyana", "5-10", "Striker"),
            Err(PlanError::UnknownPeriod(_))
        ));
    }
}
