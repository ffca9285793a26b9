use crate::models::{position_capacity, Period, PlayerEntry, PositionGroup, Roster};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Everything the match report shows for one period.
///
/// Name lists are sorted alphabetically; only available players appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    /// Defense-midfield-attack headcount, e.g. "3-4-1". Counted from each
    /// player's active position; the keeper stands outside the formation
    /// string.
    pub formation: String,
    pub came_on: Vec<String>,
    pub went_off: Vec<String>,
    pub keeper: Vec<String>,
    pub defense: Vec<String>,
    pub midfield: Vec<String>,
    pub attack: Vec<String>,
    pub other: Vec<String>,
    pub on_field: Vec<String>,
    pub bench: Vec<String>,
    /// Advisory notes about overloaded positions. Never block anything.
    pub warnings: Vec<String>,
}

/// Walks the schedule and derives substitutions, formation and bench for
/// every period. The first period treats everyone on the field as coming on.
pub fn summarize(roster: &Roster, periods: &[Period]) -> Vec<PeriodSummary> {
    let mut summaries = Vec::with_capacity(periods.len());
    let mut previous: BTreeSet<String> = BTreeSet::new();

    for (idx, &period) in periods.iter().enumerate() {
        let mut fielded: Vec<&PlayerEntry> = roster
            .players()
            .iter()
            .filter(|p| p.available && p.is_on(period))
            .collect();
        fielded.sort_by(|a, b| a.name.cmp(&b.name));
        let on_field: BTreeSet<String> = fielded.iter().map(|p| p.name.clone()).collect();
        let mut bench: Vec<String> = roster
            .players()
            .iter()
            .filter(|p| p.available && !p.is_on(period))
            .map(|p| p.name.clone())
            .collect();
        bench.sort();

        let (came_on, went_off) = if idx == 0 {
            (on_field.iter().cloned().collect(), Vec::new())
        } else {
            (
                on_field.difference(&previous).cloned().collect(),
                previous.difference(&on_field).cloned().collect(),
            )
        };

        let mut keeper = Vec::new();
        let mut defense = Vec::new();
        let mut midfield = Vec::new();
        let mut attack = Vec::new();
        let mut other = Vec::new();
        let mut occupancy: BTreeMap<&str, usize> = BTreeMap::new();
        for p in &fielded {
            // Grouping follows the active position; the occupancy note
            // follows the label shown for this period.
            *occupancy.entry(p.position_in(period)).or_insert(0) += 1;
            match PositionGroup::of(&p.active_position) {
                PositionGroup::Keeper => keeper.push(p.name.clone()),
                PositionGroup::Defense => defense.push(p.name.clone()),
                PositionGroup::Midfield => midfield.push(p.name.clone()),
                PositionGroup::Attack => attack.push(p.name.clone()),
                PositionGroup::Other => other.push(p.name.clone()),
            }
        }

        let warnings: Vec<String> = occupancy
            .iter()
            .filter(|(label, count)| **count > position_capacity(label))
            .map(|(label, count)| {
                format!(
                    "{count} players at {label} (recommended max {})",
                    position_capacity(label)
                )
            })
            .collect();

        let formation = format!("{}-{}-{}", defense.len(), midfield.len(), attack.len());

        summaries.push(PeriodSummary {
            period,
            formation,
            came_on,
            went_off,
            keeper,
            defense,
            midfield,
            attack,
            other,
            on_field: on_field.iter().cloned().collect(),
            bench,
            warnings,
        });
        previous = on_field;
    }
    summaries
}
