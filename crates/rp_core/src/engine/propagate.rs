use crate::error::{PlanError, Result};
use crate::models::{MatchSettings, Period, Roster};

/// What a propagation pass actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Periods whose assignment was written, in order.
    pub applied: Vec<Period>,
    /// First period where an on-propagation met a full field, if any.
    /// Nothing after it was touched.
    pub stopped_at: Option<Period>,
}

/// Index of the last period of the first half: the first period whose end
/// reaches the halftime minute. Falls back to 0 for degenerate schedules.
pub fn half_boundary_index(periods: &[Period], half_minutes: u32) -> usize {
    periods
        .iter()
        .position(|p| p.end >= half_minutes)
        .unwrap_or(0)
}

/// Carries a just-edited assignment forward through the schedule.
///
/// A first-half edit runs up to the halftime boundary so second-half plans
/// survive first-half experimentation; an edit at or past the boundary runs
/// to the end of the match. The status written is whatever the changed
/// period holds now. On-propagation stops entirely at the first period
/// already at capacity; off-propagation never stops early.
pub fn propagate_from(
    roster: &mut Roster,
    periods: &[Period],
    settings: &MatchSettings,
    player: &str,
    changed_index: usize,
) -> Result<PropagationReport> {
    let changed = *periods
        .get(changed_index)
        .ok_or_else(|| PlanError::UnknownPeriod(format!("index {changed_index}")))?;
    let player_idx = roster
        .index_of(player)
        .ok_or_else(|| PlanError::UnknownPlayer(player.to_string()))?;
    let new_status = roster.players()[player_idx].is_on(changed);

    let boundary = half_boundary_index(periods, settings.half_minutes());
    let end = if changed_index < boundary {
        boundary
    } else {
        periods.len() - 1
    };

    let mut report = PropagationReport::default();
    for &period in &periods[changed_index + 1..=end] {
        if new_status && !roster.players()[player_idx].is_on(period) {
            let occupied = roster.on_field_count_excluding(period, player_idx);
            if occupied >= settings.on_field_count {
                log::debug!(
                    "propagation for {} stopped at {}: {} already on field",
                    player,
                    period,
                    occupied
                );
                report.stopped_at = Some(period);
                break;
            }
        }
        roster.players_mut()[player_idx].set_on(period, new_status)?;
        report.applied.push(period);
    }
    log::debug!(
        "propagated {}={} from {} across {} periods",
        player,
        new_status,
        changed,
        report.applied.len()
    );
    Ok(report)
}
