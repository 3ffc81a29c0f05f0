//! Storage module for gather snapshots
//!
//! A snapshot bridges the two phases: `gather` writes one, `report` reads
//! it back. This module handles:
//! - SQLite snapshot schema and versioning
//! - Writing the full ordered record collection in one transaction
//! - Reading records back with absent fields preserved
//! - Fingerprinting the gathered input

mod schema;
mod sqlite;
mod traits;

pub use schema::SCHEMA_VERSION;
pub use sqlite::SqliteSnapshot;
pub use traits::{SnapshotError, SnapshotResult, SnapshotStore};

use crate::model::AppRecord;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Describes the gather run a snapshot came from
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotMeta {
    pub schema_version: u32,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    /// SHA-256 of the gathered input list, hex-encoded
    pub source_hash: String,
    pub record_count: u64,
}

impl SnapshotMeta {
    /// Metadata for a snapshot written now
    pub fn new(source_hash: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            created_at: Utc::now().to_rfc3339(),
            source_hash,
            record_count: 0,
        }
    }
}

/// A snapshot as loaded for reporting
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub meta: SnapshotMeta,
    pub records: Vec<AppRecord>,
}

/// Computes the SHA-256 fingerprint of an input list
///
/// # Returns
///
/// Hex-encoded SHA-256 hash of the content (64 characters)
pub fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Writes a new snapshot file, replacing any existing one
///
/// # Arguments
///
/// * `path` - Path to the snapshot file
/// * `source_hash` - Fingerprint of the gathered input
/// * `records` - Every completed record, in collection order
///
/// # Returns
///
/// * `Ok(SnapshotMeta)` - The metadata that was written
/// * `Err(SnapshotError)` - Failed to write; the run should stop
pub fn write_snapshot(
    path: &Path,
    source_hash: &str,
    records: &[AppRecord],
) -> SnapshotResult<SnapshotMeta> {
    let mut meta = SnapshotMeta::new(source_hash.to_string());
    meta.record_count = records.len() as u64;

    let mut store = SqliteSnapshot::create(path)?;
    store.write_records(&meta, records)?;

    tracing::info!(
        "Wrote snapshot {} with {} apps",
        path.display(),
        records.len()
    );
    Ok(meta)
}

/// Reads a snapshot file written by [`write_snapshot`]
pub fn read_snapshot(path: &Path) -> SnapshotResult<Snapshot> {
    let store = SqliteSnapshot::open(path)?;
    let meta = store.read_meta()?;
    let records = store.read_records()?;

    tracing::debug!(
        "Read snapshot {} (created {}, {} apps)",
        path.display(),
        meta.created_at,
        records.len()
    );
    Ok(Snapshot { meta, records })
}
