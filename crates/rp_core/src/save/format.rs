use super::error::SnapshotError;
use super::SNAPSHOT_VERSION;
use crate::engine::MatchContext;
use crate::models::{generate_periods, MatchSettings, Period, PlayerEntry, Roster};
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Hard cap on stored squad size. Way above anything a real team needs but
/// keeps a corrupt length field from allocating the moon.
pub const MAX_ROSTER: usize = 100;

/// On-disk form of one match plan.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlanSnapshot {
    /// Snapshot format version for migration.
    pub version: u32,

    /// Snapshot timestamp (unix milliseconds).
    pub timestamp: u64,

    /// Match duration and field size.
    pub settings: MatchSettings,

    /// The schedule the assignments are keyed by.
    pub periods: Vec<Period>,

    /// Full roster including assignment matrix and positions.
    pub players: Vec<PlayerEntry>,
}

impl PlanSnapshot {
    /// Captures the current plan with a fresh timestamp.
    pub fn from_context(ctx: &MatchContext) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            timestamp: current_timestamp(),
            settings: ctx.settings(),
            periods: ctx.periods().to_vec(),
            players: ctx.roster().players().to_vec(),
        }
    }

    /// Rebuilds a live context. Derived metrics are recomputed on the way
    /// in; they are never stored.
    pub fn into_context(self) -> Result<MatchContext, SnapshotError> {
        MatchContext::from_parts(self.settings, self.periods, Roster::from_entries(self.players))
            .map_err(|e| SnapshotError::Invalid(e.to_string()))
    }

    pub fn update_timestamp(&mut self) {
        self.timestamp = current_timestamp();
    }

    /// Structural checks run before every encode and after migration.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.players.len() > MAX_ROSTER {
            return Err(SnapshotError::DataTooLarge { size: self.players.len() });
        }

        self.settings
            .validate()
            .map_err(|e| SnapshotError::Invalid(e.to_string()))?;

        let expected = generate_periods(self.settings.total_minutes)
            .map_err(|e| SnapshotError::Invalid(e.to_string()))?;
        if self.periods != expected {
            return Err(SnapshotError::Invalid(
                "period list does not match the configured duration".to_string(),
            ));
        }

        let mut names = std::collections::HashSet::new();
        for player in &self.players {
            if !names.insert(&player.name) {
                return Err(SnapshotError::Invalid(format!(
                    "duplicate player name: {}",
                    player.name
                )));
            }
            if player.eligible_positions.is_empty() {
                return Err(SnapshotError::Invalid(format!(
                    "{} has no eligible positions",
                    player.name
                )));
            }
            if !player.eligible_positions.contains(&player.active_position) {
                return Err(SnapshotError::Invalid(format!(
                    "{} is set to a position they are not eligible for",
                    player.name
                )));
            }
            // Assignment coverage must be exactly the period list, no more.
            if player.assignment.len() != self.periods.len()
                || self.periods.iter().any(|p| !player.assignment.contains_key(p))
            {
                return Err(SnapshotError::Invalid(format!(
                    "{} has assignment entries that do not match the schedule",
                    player.name
                )));
            }
        }

        Ok(())
    }
}

/// Serialize and compress a snapshot for disk.
pub fn serialize_and_compress(snapshot: &PlanSnapshot) -> Result<Vec<u8>, SnapshotError> {
    // Validate before serialization
    snapshot.validate()?;

    // 1. Serialize to MessagePack with field names
    let msgpack = to_vec_named(snapshot).map_err(SnapshotError::Serialization)?;

    // 2. Compress with LZ4 (size prepended for easy decompression)
    let compressed = compress_prepend_size(&msgpack);

    // 3. Add SHA256 checksum at the end
    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Decompress and deserialize snapshot bytes.
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<PlanSnapshot, SnapshotError> {
    // Check minimum size (header + checksum)
    if bytes.len() < 4 + 32 {
        return Err(SnapshotError::Corrupted);
    }

    // Split payload and checksum
    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    // Verify checksum
    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated_checksum = hasher.finalize();

    if &calculated_checksum[..] != checksum_bytes {
        return Err(SnapshotError::ChecksumMismatch);
    }

    // Decompress
    let msgpack = decompress_size_prepended(payload).map_err(|_| SnapshotError::Decompression)?;

    // Deserialize
    let snapshot: PlanSnapshot = from_slice(&msgpack).map_err(SnapshotError::Deserialization)?;

    // Validate version
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    Ok(snapshot)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}
