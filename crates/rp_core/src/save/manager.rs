use super::error::SnapshotError;
use super::format::{decompress_and_deserialize, serialize_and_compress, PlanSnapshot};
use super::migration::migrate_snapshot;
use crate::engine::MatchContext;

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::Path;

/// Disk access for plan snapshots. All paths are explicit; there is no
/// ambient current-plan state anywhere in the crate.
pub struct SnapshotManager;

impl SnapshotManager {
    /// Captures `ctx` and writes it to `path`.
    pub fn save_context(path: &Path, ctx: &MatchContext) -> Result<(), SnapshotError> {
        let snapshot = PlanSnapshot::from_context(ctx);
        Self::save_to_path(path, &snapshot)
    }

    pub fn save_to_path(path: &Path, snapshot: &PlanSnapshot) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serialize_and_compress(snapshot)?;

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;

            // sync_all ensures data is written to disk (portable fsync)
            file.sync_all()?;
        }

        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<PlanSnapshot, SnapshotError> {
        if !path.exists() {
            return Err(SnapshotError::FileNotFound { path: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let mut snapshot = decompress_and_deserialize(&data)?;

        // Apply migrations if needed
        snapshot = migrate_snapshot(snapshot)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(snapshot)
    }

    /// Loads a snapshot and turns it straight into a live context with
    /// fresh metrics.
    pub fn load_context(path: &Path) -> Result<MatchContext, SnapshotError> {
        Self::load_from_path(path)?.into_context()
    }

    /// Cheap header view for listings.
    pub fn info(path: &Path) -> Result<SnapshotInfo, SnapshotError> {
        let snapshot = Self::load_from_path(path)?;
        Ok(SnapshotInfo {
            timestamp: snapshot.timestamp,
            version: snapshot.version,
            player_count: snapshot.players.len(),
            total_minutes: snapshot.settings.total_minutes,
            on_field_count: snapshot.settings.on_field_count,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    pub timestamp: u64,
    pub version: u32,
    pub player_count: usize,
    pub total_minutes: u32,
    pub on_field_count: usize,
}

impl SnapshotInfo {
    pub fn format_timestamp(&self) -> String {
        use time::{format_description::well_known::Rfc3339, OffsetDateTime};

        let timestamp =
            OffsetDateTime::from_unix_timestamp_nanos((self.timestamp * 1_000_000) as i128)
                .unwrap_or_else(|_| OffsetDateTime::now_utc());

        timestamp.format(&Rfc3339).unwrap_or_else(|_| "Unknown".to_string())
    }

    pub fn get_display_text(&self) -> String {
        format!(
            "{} min, {} on the field, {} players ({})",
            self.total_minutes,
            self.on_field_count,
            self.player_count,
            self.format_timestamp()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchSettings;
    use tempfile::TempDir;

    fn starter_ctx() -> MatchContext {
        MatchContext::with_starter_roster(MatchSettings::default()).unwrap()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plan.dat");

        let mut ctx = starter_ctx();
        ctx.toggle("Karen", "0-15", true).unwrap();
        SnapshotManager::save_context(&path, &ctx).unwrap();

        let loaded = SnapshotManager::load_context(&path).unwrap();
        assert_eq!(loaded.roster().len(), 13);
        assert!(loaded.roster().player("Karen").unwrap().is_on(loaded.periods()[0]));
        assert_eq!(loaded.roster().player("Karen").unwrap().metrics.total_minutes, 40);
    }

    #[test]
    fn test_atomic_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("atomic_test.dat");

        let snapshot = PlanSnapshot::from_context(&starter_ctx());
        SnapshotManager::save_to_path(&path, &snapshot).unwrap();

        // File should exist and be valid
        assert!(path.exists());
        let loaded = SnapshotManager::load_from_path(&path).unwrap();
        assert_eq!(snapshot.version, loaded.version);

        // Temp file should not exist
        let temp_path = path.with_extension("tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nothing_here.dat");

        let result = SnapshotManager::load_from_path(&path);
        assert!(matches!(result, Err(SnapshotError::FileNotFound { .. })));
        assert!(result.unwrap_err().is_recoverable());
    }

    #[test]
    fn test_garbage_on_disk_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.dat");
        std::fs::write(&path, vec![0u8; 128]).unwrap();

        assert!(matches!(
            SnapshotManager::load_from_path(&path),
            Err(SnapshotError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_info_reads_the_header_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plan.dat");
        SnapshotManager::save_context(&path, &starter_ctx()).unwrap();

        let info = SnapshotManager::info(&path).unwrap();
        assert_eq!(info.player_count, 13);
        assert_eq!(info.total_minutes, 80);
        assert_eq!(info.on_field_count, 9);
        assert!(info.format_timestamp().contains('T'));
    }
}
