//! SQLite snapshot implementation
//!
//! This module provides a SQLite-based implementation of the SnapshotStore trait.

use crate::model::{AppRecord, Developer};
use crate::storage::schema::{initialize_schema, SCHEMA_VERSION};
use crate::storage::traits::{SnapshotError, SnapshotResult, SnapshotStore};
use crate::storage::SnapshotMeta;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;

/// SQLite snapshot backend
pub struct SqliteSnapshot {
    conn: Connection,
}

impl SqliteSnapshot {
    /// Creates a fresh snapshot file, replacing any existing one
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the snapshot file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSnapshot)` - Empty snapshot ready for writing
    /// * `Err(SnapshotError)` - Failed to remove the old file or create the new one
    pub fn create(path: &Path) -> SnapshotResult<Self> {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!("Replacing existing snapshot {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = DELETE;
            PRAGMA synchronous = FULL;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Opens an existing snapshot for reading
    ///
    /// Fails if the file is missing or was written with another schema version.
    pub fn open(path: &Path) -> SnapshotResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let snapshot = Self { conn };
        snapshot.read_meta()?;
        Ok(snapshot)
    }

    /// Creates an in-memory snapshot (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> SnapshotResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count_records(&self) -> SnapshotResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM apps", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl SnapshotStore for SqliteSnapshot {
    fn write_records(&mut self, meta: &SnapshotMeta, records: &[AppRecord]) -> SnapshotResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM apps", [])?;
        tx.execute("DELETE FROM snapshot_meta", [])?;
        tx.execute(
            "INSERT INTO snapshot_meta (id, schema_version, created_at, source_hash, record_count)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                meta.schema_version,
                meta.created_at,
                meta.source_hash,
                records.len() as i64
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO apps (position, name, url, content_rating, description, original_name,
                 developer_name, developer_url, star_rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for (position, record) in records.iter().enumerate() {
                let developer = record.developer.as_ref();
                stmt.execute(params![
                    position as i64,
                    record.name,
                    record.url,
                    record.content_rating,
                    record.description,
                    record.original_name,
                    developer.map(|d| d.name.as_str()),
                    developer.map(|d| d.url.as_str()),
                    record.star_rating,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!("Wrote {} records to snapshot", records.len());
        Ok(())
    }

    fn read_meta(&self) -> SnapshotResult<SnapshotMeta> {
        let meta = self
            .conn
            .query_row(
                "SELECT schema_version, created_at, source_hash, record_count
                 FROM snapshot_meta WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?
            .ok_or(SnapshotError::MissingMetadata)?;

        let (schema_version, created_at, source_hash, record_count) = meta;
        if schema_version != SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: schema_version,
                expected: SCHEMA_VERSION,
            });
        }

        Ok(SnapshotMeta {
            schema_version,
            created_at,
            source_hash,
            record_count: record_count as u64,
        })
    }

    fn read_records(&self) -> SnapshotResult<Vec<AppRecord>> {
        let meta = self.read_meta()?;
        let stored = self.count_records()?;
        if stored != meta.record_count {
            return Err(SnapshotError::Corrupt(format!(
                "metadata lists {} records but {} are stored",
                meta.record_count, stored
            )));
        }

        let mut stmt = self.conn.prepare(
            "SELECT name, url, content_rating, description, original_name,
             developer_name, developer_url, star_rating
             FROM apps ORDER BY position",
        )?;

        let records = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<AppRecord> {
    let developer = match (
        row.get::<_, Option<String>>(5)?,
        row.get::<_, Option<String>>(6)?,
    ) {
        (Some(name), Some(url)) => Some(Developer { name, url }),
        _ => None,
    };

    Ok(AppRecord {
        name: row.get(0)?,
        url: row.get(1)?,
        content_rating: row.get(2)?,
        description: row.get(3)?,
        original_name: row.get(4)?,
        developer,
        star_rating: row.get(7)?,
    })
}
