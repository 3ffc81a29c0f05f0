//! Snapshot store trait and error types
//!
//! This module defines the trait interface for snapshot backends and
//! associated error types.

use crate::model::AppRecord;
use crate::storage::SnapshotMeta;
use thiserror::Error;

/// Errors that can occur reading or writing a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported snapshot version {found} (this build reads version {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Snapshot has no metadata; was it written by `gather`?")]
    MissingMetadata,

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Trait for snapshot backend implementations
///
/// A snapshot holds one gather run: its metadata and the full ordered
/// collection of app records, with absent optional fields preserved as
/// absent.
pub trait SnapshotStore {
    /// Writes the metadata and every record, replacing previous content
    ///
    /// Either everything is written or nothing is.
    fn write_records(&mut self, meta: &SnapshotMeta, records: &[AppRecord]) -> SnapshotResult<()>;

    /// Reads the snapshot metadata
    fn read_meta(&self) -> SnapshotResult<SnapshotMeta>;

    /// Reads every record in the order it was written
    fn read_records(&self) -> SnapshotResult<Vec<AppRecord>>;
}
