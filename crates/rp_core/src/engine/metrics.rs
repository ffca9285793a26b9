use crate::models::{MatchSettings, Period, Roster};
use serde::Serialize;

/// How much of the field's capacity the plan has handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanTotals {
    /// Player-minutes assigned to available players.
    pub used_minutes: u64,
    /// Player-minutes the field offers: duration times field size.
    pub capacity_minutes: u64,
}

impl PlanTotals {
    /// A balanced plan fields exactly as many player-minutes as the match
    /// offers. Less means gaps, more means too many players scheduled on.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.used_minutes == self.capacity_minutes
    }
}

/// Rewrites every player's derived numbers from the assignment matrix.
///
/// Totals count assigned minutes for everyone. Targets are the even split of
/// the field's capacity over available players, rounded to the nearest
/// minute; unavailable players keep whatever target they last had and stay
/// out of the divisor. Runs after every mutation, so re-running it is a
/// no-op.
pub fn recompute_metrics(roster: &mut Roster, periods: &[Period], settings: &MatchSettings) {
    let available = roster.available_count();
    let target = if available > 0 {
        let share = settings.capacity_minutes() as f64 / available as f64;
        share.round() as u32
    } else {
        0
    };

    for player in roster.players_mut() {
        let total: u32 = periods
            .iter()
            .filter(|p| player.is_on(**p))
            .map(|p| p.duration())
            .sum();
        player.metrics.total_minutes = total;
        if player.available {
            player.metrics.target_minutes = target;
        }
        player.metrics.difference =
            i64::from(player.metrics.total_minutes) - i64::from(player.metrics.target_minutes);
    }
}

/// Sums assigned minutes straight from the matrix, independent of any cached
/// metrics. Only available players count, mirroring the capacity rules.
pub fn plan_totals(roster: &Roster, periods: &[Period], settings: &MatchSettings) -> PlanTotals {
    let used: u64 = periods
        .iter()
        .map(|p| roster.on_field_count(*p) as u64 * u64::from(p.duration()))
        .sum();
    PlanTotals {
        used_minutes: used,
        capacity_minutes: settings.capacity_minutes(),
    }
}
