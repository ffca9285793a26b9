use crate::error::{PlanError, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Width of the opening period of each half, in minutes.
pub const OPENER_MINUTES: u32 = 15;

/// Maximum width of every later period within a half, in minutes.
pub const WINDOW_MINUTES: u32 = 10;

/// One substitution window: a half-open minute range `[start, end)`.
///
/// Periods are identified structurally by their `(start, end)` pair. The
/// `"{start}-{end}"` label is only a rendering of that identity and is what
/// appears in serialized form, so period-keyed maps round-trip keyed by
/// label strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub start: u32,
    pub end: u32,
}

impl Period {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn duration(&self) -> u32 {
        self.end - self.start
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for Period {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) =
            s.split_once('-').ok_or_else(|| PlanError::UnknownPeriod(s.to_string()))?;
        let start: u32 =
            start.trim().parse().map_err(|_| PlanError::UnknownPeriod(s.to_string()))?;
        let end: u32 = end.trim().parse().map_err(|_| PlanError::UnknownPeriod(s.to_string()))?;
        if start >= end {
            return Err(PlanError::UnknownPeriod(s.to_string()));
        }
        Ok(Period::new(start, end))
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PeriodVisitor;

        impl Visitor<'_> for PeriodVisitor {
            type Value = Period;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a period label like \"0-15\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Period, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(PeriodVisitor)
    }
}

/// Splits a match into substitution windows.
///
/// Each half opens with a 15-minute period (clamped when the half itself is
/// shorter) followed by windows of at most 10 minutes, the last one shortened
/// to end exactly on the half boundary. The second half absorbs the odd
/// minute of an odd-length match. Returns `InvalidDuration` for a zero-length
/// match.
pub fn generate_periods(total_minutes: u32) -> Result<Vec<Period>> {
    if total_minutes == 0 {
        return Err(PlanError::InvalidDuration(total_minutes));
    }

    let half = total_minutes / 2;
    let mut periods = Vec::new();

    if half > 0 {
        let opener_end = OPENER_MINUTES.min(half);
        periods.push(Period::new(0, opener_end));
        let mut cursor = opener_end;
        while cursor < half {
            let next = (cursor + WINDOW_MINUTES).min(half);
            periods.push(Period::new(cursor, next));
            cursor = next;
        }
    }

    let mut cursor = half;
    while cursor < total_minutes {
        let next = (cursor + WINDOW_MINUTES).min(total_minutes);
        periods.push(Period::new(cursor, next));
        cursor = next;
    }

    Ok(periods)
}
