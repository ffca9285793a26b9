use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const KEEPER: &str = "Keeper";
pub const BACK: &str = "Back";
pub const CENTER_BACK: &str = "Center-back";
pub const CENTRAL_MIDFIELD: &str = "Central midfield";
pub const WING: &str = "Wing";
pub const STRIKER: &str = "Striker";

/// Formation bucket for a position label.
///
/// The label-to-group mapping is closed and case-sensitive. Defense, midfield
/// and attack feed the `D-M-A` formation count; the keeper and unrecognized
/// labels are reported in their own buckets and stay out of the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionGroup {
    Keeper,
    Defense,
    Midfield,
    Attack,
    Other,
}

impl PositionGroup {
    pub fn of(label: &str) -> Self {
        match label {
            KEEPER => PositionGroup::Keeper,
            BACK | CENTER_BACK => PositionGroup::Defense,
            CENTRAL_MIDFIELD | WING => PositionGroup::Midfield,
            STRIKER => PositionGroup::Attack,
            _ => PositionGroup::Other,
        }
    }

    #[inline]
    pub const fn counts_in_formation(self) -> bool {
        matches!(self, PositionGroup::Defense | PositionGroup::Midfield | PositionGroup::Attack)
    }
}

const DEFAULT_POSITION_CAPACITY: usize = 2;

static POSITION_CAPACITY: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    HashMap::from([
        (KEEPER, 1),
        (BACK, 4), // room for a left and a right back pair
        (CENTER_BACK, 2),
        (CENTRAL_MIDFIELD, 2),
        (WING, 4),
        (STRIKER, 2),
    ])
});

/// Recommended on-field maximum for a position label. Advisory only: the
/// summarizer turns breaches into warnings, nothing blocks on it.
pub fn position_capacity(label: &str) -> usize {
    POSITION_CAPACITY.get(label).copied().unwrap_or(DEFAULT_POSITION_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_labels_group_as_expected() {
        assert_eq!(PositionGroup::of(KEEPER), PositionGroup::Keeper);
        assert_eq!(PositionGroup::of(BACK), PositionGroup::Defense);
        assert_eq!(PositionGroup::of(CENTER_BACK), PositionGroup::Defense);
        assert_eq!(PositionGroup::of(CENTRAL_MIDFIELD), PositionGroup::Midfield);
        assert_eq!(PositionGroup::of(WING), PositionGroup::Midfield);
        assert_eq!(PositionGroup::of(STRIKER), PositionGroup::Attack);
    }

    #[test]
    fn test_unknown_labels_land_in_other() {
        assert_eq!(PositionGroup::of("Libero"), PositionGroup::Other);
        assert_eq!(PositionGroup::of("keeper"), PositionGroup::Other); // case matters
        assert!(!PositionGroup::Other.counts_in_formation());
        assert!(!PositionGroup::Keeper.counts_in_formation());
    }

    #[test]
    fn test_position_capacity_table() {
        assert_eq!(position_capacity(KEEPER), 1);
        assert_eq!(position_capacity(BACK), 4);
        assert_eq!(position_capacity(WING), 4);
        assert_eq!(position_capacity(STRIKER), 2);
        assert_eq!(position_capacity("Libero"), 2);
    }
}
