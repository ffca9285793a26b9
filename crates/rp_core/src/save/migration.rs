use super::error::SnapshotError;
use super::format::PlanSnapshot;
use super::SNAPSHOT_VERSION;
use crate::models::{
    generate_periods, MatchSettings, MAX_ON_FIELD, MAX_TOTAL_MINUTES, MIN_ON_FIELD,
    MIN_TOTAL_MINUTES,
};

/// Migrate snapshot data from older versions to the current version
pub fn migrate_snapshot(mut snapshot: PlanSnapshot) -> Result<PlanSnapshot, SnapshotError> {
    let original_version = snapshot.version;

    // Apply migrations step by step
    snapshot = match snapshot.version {
        0 => migrate_v0_to_v1(snapshot)?,
        1 => snapshot, // Current version, no migration needed
        // Newer than this build writes; refuse rather than guess.
        _ => {
            return Err(SnapshotError::VersionMismatch {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
    };

    // Update to current version
    snapshot.version = SNAPSHOT_VERSION;
    snapshot.update_timestamp();

    if original_version != SNAPSHOT_VERSION {
        log::info!(
            "Migrated snapshot from version {} to {}",
            original_version,
            SNAPSHOT_VERSION
        );
    }

    Ok(snapshot)
}

/// Migrate from version 0 to version 1.
///
/// Version 0 had no per-period position overrides and no bounds on the
/// match settings.
fn migrate_v0_to_v1(mut snapshot: PlanSnapshot) -> Result<PlanSnapshot, SnapshotError> {
    log::info!("Migrating snapshot from version 0 to 1");

    // 1. Seed per-period positions from the active one.
    for player in &mut snapshot.players {
        for period in &snapshot.periods {
            if !player.position_at.contains_key(period) {
                player.position_at.insert(*period, player.active_position.clone());
            }
        }
    }

    // 2. Pull out-of-bounds settings back into range. The old schedule is
    // meaningless under changed settings, so it is rebuilt and cleared.
    let clamped = MatchSettings {
        total_minutes: snapshot.settings.total_minutes.clamp(MIN_TOTAL_MINUTES, MAX_TOTAL_MINUTES),
        on_field_count: snapshot.settings.on_field_count.clamp(MIN_ON_FIELD, MAX_ON_FIELD),
    };
    if clamped != snapshot.settings {
        log::warn!(
            "Snapshot settings out of bounds ({} min, {} on field), clamping",
            snapshot.settings.total_minutes,
            snapshot.settings.on_field_count
        );
        snapshot.settings = clamped;
        snapshot.periods = generate_periods(clamped.total_minutes)
            .map_err(|e| SnapshotError::Invalid(e.to_string()))?;
        for player in &mut snapshot.players {
            player.reset_coverage(&snapshot.periods);
        }
    }

    Ok(snapshot)
}

/// Check if a snapshot needs migration
pub fn needs_migration(snapshot: &PlanSnapshot) -> bool {
    snapshot.version < SNAPSHOT_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MatchContext;

    fn v0_snapshot() -> PlanSnapshot {
        let ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        let mut snapshot = PlanSnapshot::from_context(&ctx);
        snapshot.version = 0;
        for player in &mut snapshot.players {
            player.position_at.clear();
        }
        snapshot
    }

    #[test]
    fn test_v0_positions_are_backfilled() {
        let snapshot = v0_snapshot();
        assert!(needs_migration(&snapshot));

        let migrated = migrate_snapshot(snapshot).unwrap();
        assert_eq!(migrated.version, SNAPSHOT_VERSION);
        for player in &migrated.players {
            assert_eq!(player.position_at.len(), migrated.periods.len());
            for label in player.position_at.values() {
                assert_eq!(label, &player.active_position);
            }
        }
        migrated.validate().unwrap();
    }

    #[test]
    fn test_v0_out_of_bounds_settings_are_clamped() {
        let mut snapshot = v0_snapshot();
        snapshot.settings.total_minutes = 200;
        snapshot.settings.on_field_count = 15;

        let migrated = migrate_snapshot(snapshot).unwrap();
        assert_eq!(migrated.settings.total_minutes, 120);
        assert_eq!(migrated.settings.on_field_count, 11);
        assert_eq!(migrated.periods.last().unwrap().to_string(), "110-120");
        for player in &migrated.players {
            assert_eq!(player.assignment.len(), migrated.periods.len());
        }
        migrated.validate().unwrap();
    }

    #[test]
    fn test_current_version_passes_through() {
        let ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        let snapshot = PlanSnapshot::from_context(&ctx);
        assert!(!needs_migration(&snapshot));

        let before = snapshot.players.clone();
        let migrated = migrate_snapshot(snapshot).unwrap();
        assert_eq!(migrated.version, SNAPSHOT_VERSION);
        assert_eq!(migrated.players.len(), before.len());
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        let mut snapshot = PlanSnapshot::from_context(&ctx);
        snapshot.version = 7;

        assert!(matches!(
            migrate_snapshot(snapshot),
            Err(SnapshotError::VersionMismatch { found: 7, expected: SNAPSHOT_VERSION })
        ));
    }
}
