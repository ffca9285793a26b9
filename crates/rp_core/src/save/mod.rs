// Snapshot persistence for match plans
// MessagePack + LZ4 compression with versioning and integrity checks

pub mod error;
pub mod format;
pub mod manager;
pub mod migration;

pub use error::SnapshotError;
pub use format::{
    current_timestamp, decompress_and_deserialize, serialize_and_compress, PlanSnapshot,
    MAX_ROSTER,
};
pub use manager::{SnapshotInfo, SnapshotManager};
pub use migration::{migrate_snapshot, needs_migration};

pub const SNAPSHOT_VERSION: u32 = 1;
