use super::period::Period;
use super::player::PlayerEntry;
use super::position;
use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};

/// Ordered collection of players. Names are unique; insertion order is the
/// display order everywhere in the app.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<PlayerEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps already-built entries, trusting their coverage.
    pub fn from_entries(players: Vec<PlayerEntry>) -> Self {
        Self { players }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PlayerEntry] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [PlayerEntry] {
        &mut self.players
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    pub fn player(&self, name: &str) -> Result<&PlayerEntry> {
        self.players
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| PlanError::UnknownPlayer(name.to_string()))
    }

    pub fn player_mut(&mut self, name: &str) -> Result<&mut PlayerEntry> {
        self.players
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| PlanError::UnknownPlayer(name.to_string()))
    }

    /// Adds a player with full off-field coverage for `periods`.
    ///
    /// The active position defaults to the first eligible one when `active`
    /// is `None`; when given it must be a member of `positions`.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        positions: Vec<String>,
        active: Option<String>,
        periods: &[Period],
    ) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlanError::InvalidName(name));
        }
        if self.index_of(&name).is_some() {
            return Err(PlanError::DuplicatePlayer(name));
        }
        if positions.is_empty() || positions.iter().any(|p| p.trim().is_empty()) {
            return Err(PlanError::NoPositions(name));
        }
        let active = match active {
            Some(label) => {
                if !positions.contains(&label) {
                    return Err(PlanError::PositionNotEligible {
                        player: name,
                        position: label,
                    });
                }
                label
            }
            None => positions[0].clone(),
        };
        self.players.push(PlayerEntry::new(name, positions, active, periods));
        Ok(())
    }

    /// Removes a player and returns their entry so callers can report what
    /// was dropped.
    pub fn remove_player(&mut self, name: &str) -> Result<PlayerEntry> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| PlanError::UnknownPlayer(name.to_string()))?;
        Ok(self.players.remove(idx))
    }

    pub fn set_available(&mut self, name: &str, available: bool) -> Result<()> {
        self.player_mut(name)?.available = available;
        Ok(())
    }

    /// Adds one eligible position. Returns `false` when the player already
    /// had it, so callers can tell a no-op apart from a real change.
    pub fn add_eligible_position(&mut self, name: &str, label: impl Into<String>) -> Result<bool> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(PlanError::InvalidPosition(label));
        }
        let player = self.player_mut(name)?;
        if player.eligible_positions.contains(&label) {
            return Ok(false);
        }
        player.eligible_positions.push(label);
        Ok(true)
    }

    /// Switches the active position; the label must already be eligible.
    pub fn set_active_position(&mut self, name: &str, label: &str) -> Result<()> {
        let player = self.player_mut(name)?;
        if !player.eligible_positions.iter().any(|p| p == label) {
            return Err(PlanError::PositionNotEligible {
                player: player.name.clone(),
                position: label.to_string(),
            });
        }
        player.active_position = label.to_string();
        Ok(())
    }

    /// Overrides the position shown for one period. Any label goes; this is
    /// a per-match note, not a squad-level capability claim.
    pub fn set_position_at(&mut self, name: &str, period: Period, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(PlanError::InvalidPosition(label));
        }
        self.player_mut(name)?.position_at.insert(period, label);
        Ok(())
    }

    /// Rebuilds every player's period coverage after the schedule changed.
    /// All assignments reset to off-field.
    pub fn regenerate_coverage(&mut self, periods: &[Period]) {
        for player in &mut self.players {
            player.reset_coverage(periods);
        }
    }

    /// Players counted against the field capacity in `period`: available and
    /// assigned on.
    pub fn on_field_count(&self, period: Period) -> usize {
        self.players
            .iter()
            .filter(|p| p.available && p.is_on(period))
            .count()
    }

    /// Same headcount with one player ignored, for capacity checks during
    /// propagation.
    pub fn on_field_count_excluding(&self, period: Period, skip: usize) -> usize {
        self.players
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != skip && p.available && p.is_on(period))
            .count()
    }

    pub fn available_count(&self) -> usize {
        self.players.iter().filter(|p| p.available).count()
    }

    /// The squad a fresh plan starts from.
    pub fn starter(periods: &[Period]) -> Self {
        let entries = [
            ("Susanne", position::KEEPER),
            ("Tuva", position::CENTER_BACK),
            ("Adele", position::BACK),
            ("Sarah", position::BACK),
            ("Madelen", position::CENTRAL_MIDFIELD),
            ("Ingrid", position::CENTRAL_MIDFIELD),
            ("Karen", position::STRIKER),
            ("Diyana", position::WING),
            ("Martine", position::BACK),
            ("Hanna", position::BACK),
            ("Veslemøy", position::WING),
            ("Emilie", position::WING),
            ("Lilly", position::WING),
        ];
        Self {
            players: entries
                .iter()
                .map(|(name, pos)| PlayerEntry::with_position(*name, *pos, periods))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a PlayerEntry;
    type IntoIter = std::slice::Iter<'a, PlayerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}
