use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};

pub const MIN_TOTAL_MINUTES: u32 = 40;
pub const MAX_TOTAL_MINUTES: u32 = 120;
pub const MIN_ON_FIELD: usize = 7;
pub const MAX_ON_FIELD: usize = 11;

pub const DEFAULT_TOTAL_MINUTES: u32 = 80;
pub const DEFAULT_ON_FIELD: usize = 9;

/// The two knobs a plan is built around: how long the match is and how many
/// players stand on the field at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSettings {
    pub total_minutes: u32,
    pub on_field_count: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            total_minutes: DEFAULT_TOTAL_MINUTES,
            on_field_count: DEFAULT_ON_FIELD,
        }
    }
}

impl MatchSettings {
    pub fn new(total_minutes: u32, on_field_count: usize) -> Result<Self> {
        let settings = Self {
            total_minutes,
            on_field_count,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_TOTAL_MINUTES..=MAX_TOTAL_MINUTES).contains(&self.total_minutes) {
            return Err(PlanError::InvalidDuration(self.total_minutes));
        }
        if !(MIN_ON_FIELD..=MAX_ON_FIELD).contains(&self.on_field_count) {
            return Err(PlanError::InvalidCapacity(self.on_field_count));
        }
        Ok(())
    }

    /// End of the first half. The second half absorbs the odd minute.
    #[inline]
    pub const fn half_minutes(&self) -> u32 {
        self.total_minutes / 2
    }

    /// Total player-minutes the field offers over the whole match.
    #[inline]
    pub const fn capacity_minutes(&self) -> u64 {
        self.total_minutes as u64 * self.on_field_count as u64
    }
}
