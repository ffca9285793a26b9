//! Data model: periods, positions, players, the roster, and match settings.

pub mod period;
pub mod player;
pub mod position;
pub mod roster;
pub mod settings;

pub use period::{generate_periods, Period, OPENER_MINUTES, WINDOW_MINUTES};
pub use player::{PlayerEntry, PlayerMetrics};
pub use position::{position_capacity, PositionGroup};
pub use roster::Roster;
pub use settings::{
    MatchSettings, DEFAULT_ON_FIELD, DEFAULT_TOTAL_MINUTES, MAX_ON_FIELD, MAX_TOTAL_MINUTES,
    MIN_ON_FIELD, MIN_TOTAL_MINUTES,
};
