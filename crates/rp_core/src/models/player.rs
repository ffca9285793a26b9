use super::period::Period;
use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived playtime numbers for one player.
///
/// Never persisted: the metrics pass recomputes these from the assignment
/// matrix, and snapshot load runs that pass before handing the roster back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerMetrics {
    /// Minutes scheduled on the field across all periods.
    pub total_minutes: u32,
    /// Even playtime share for available players; kept at its last value for
    /// unavailable ones.
    pub target_minutes: u32,
    /// `total_minutes - target_minutes`.
    pub difference: i64,
}

/// One roster row: player identity plus every per-period value tracked for
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Unique player name, the stable roster key.
    pub name: String,

    /// Positions the player can cover. Insertion order is display order, not
    /// priority; always non-empty.
    pub eligible_positions: Vec<String>,

    /// Currently selected position, always one of `eligible_positions`.
    pub active_position: String,

    /// Unavailable players keep all their data but leave every headcount and
    /// the target-minute divisor.
    pub available: bool,

    /// On-field flag per period, covering every period in the current
    /// configuration.
    pub assignment: BTreeMap<Period, bool>,

    /// Position label per period. Defaults to the active position when a
    /// period is created and may be overridden freely; unlike the active
    /// position it is not checked against eligibility. Absent in version 0
    /// snapshots, backfilled on migration.
    #[serde(default)]
    pub position_at: BTreeMap<Period, String>,

    #[serde(skip)]
    pub metrics: PlayerMetrics,
}

impl PlayerEntry {
    /// Builds an entry with full coverage for `periods`, everything off-field.
    pub fn new(
        name: impl Into<String>,
        eligible_positions: Vec<String>,
        active_position: impl Into<String>,
        periods: &[Period],
    ) -> Self {
        let mut entry = Self {
            name: name.into(),
            eligible_positions,
            active_position: active_position.into(),
            available: true,
            assignment: BTreeMap::new(),
            position_at: BTreeMap::new(),
            metrics: PlayerMetrics::default(),
        };
        entry.reset_coverage(periods);
        entry
    }

    /// Single-position convenience used by the starter squad.
    pub fn with_position(
        name: impl Into<String>,
        position: impl Into<String>,
        periods: &[Period],
    ) -> Self {
        let position = position.into();
        Self::new(name, vec![position.clone()], position, periods)
    }

    /// Drops all period-keyed data and rebuilds it for `periods`: off-field
    /// everywhere, per-period position set to the active position.
    pub fn reset_coverage(&mut self, periods: &[Period]) {
        self.assignment = periods.iter().map(|p| (*p, false)).collect();
        self.position_at = periods.iter().map(|p| (*p, self.active_position.clone())).collect();
    }

    #[inline]
    pub fn is_on(&self, period: Period) -> bool {
        self.assignment.get(&period).copied().unwrap_or(false)
    }

    /// Writes the on-field flag for `period`. A missing entry means the
    /// coverage invariant is broken and surfaces as `InconsistentState`.
    pub fn set_on(&mut self, period: Period, on: bool) -> Result<()> {
        match self.assignment.get_mut(&period) {
            Some(slot) => {
                *slot = on;
                Ok(())
            }
            None => Err(PlanError::InconsistentState(format!(
                "{} has no assignment entry for period {}",
                self.name, period
            ))),
        }
    }

    /// Position label shown for `period`, falling back to the active
    /// position when no override exists.
    pub fn position_in(&self, period: Period) -> &str {
        self.position_at.get(&period).map(String::as_str).unwrap_or(&self.active_position)
    }
}
