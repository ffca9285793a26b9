use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid snapshot: {0}")]
    Invalid(String),

    #[error("Snapshot too large: {size} players")]
    DataTooLarge { size: usize },
}

impl SnapshotError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SnapshotError::Io(_) => true,
            SnapshotError::FileNotFound { .. } => true,
            SnapshotError::VersionMismatch { .. } => true, // A newer build reads it fine
            SnapshotError::Corrupted => false,
            SnapshotError::ChecksumMismatch => false,
            _ => false,
        }
    }
}
