use thiserror::Error;

/// Errors surfaced by plan operations.
///
/// Capacity refusals are not errors: a toggle that would overfill the pitch
/// comes back as a `Denied` decision, not an `Err`. The variants here cover
/// bad configuration, references to entities that do not exist, and internal
/// coverage violations that indicate a bug rather than a bad request.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid match duration: {0} minutes")]
    InvalidDuration(u32),

    #[error("Invalid on-field count: {0}")]
    InvalidCapacity(usize),

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    #[error("Duplicate player: {0}")]
    DuplicatePlayer(String),

    #[error("Invalid player name: {0:?}")]
    InvalidName(String),

    #[error("Invalid position label: {0:?}")]
    InvalidPosition(String),

    #[error("No eligible positions given for player: {0}")]
    NoPositions(String),

    #[error("Position '{position}' is not among {player}'s eligible positions")]
    PositionNotEligible { player: String, position: String },

    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
