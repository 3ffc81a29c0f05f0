//! Snapshot schema definitions
//!
//! This module contains the SQL schema of the snapshot file. Bump
//! [`SCHEMA_VERSION`] whenever a table changes shape.

/// Version written into every snapshot and required when reading one
pub const SCHEMA_VERSION: u32 = 1;

/// SQL schema for the snapshot
pub const SCHEMA_SQL: &str = r#"
-- One row describing the gather run
CREATE TABLE IF NOT EXISTS snapshot_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    source_hash TEXT NOT NULL,
    record_count INTEGER NOT NULL
);

-- Gathered apps, in collection order
CREATE TABLE IF NOT EXISTS apps (
    position INTEGER PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    url TEXT NOT NULL CHECK (length(trim(url)) > 0),
    content_rating TEXT,
    description TEXT,
    original_name TEXT,
    developer_name TEXT,
    developer_url TEXT,
    star_rating REAL,
    CHECK ((developer_name IS NULL) = (developer_url IS NULL))
);
"#;

/// Initializes the snapshot schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
