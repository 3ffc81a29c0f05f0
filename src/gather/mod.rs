//! Gather phase: read the app list, fetch every store page, write a snapshot
//!
//! This module handles:
//! - Parsing the markdown link list into app records
//! - Fetching and extracting store page details
//! - Running fetches on a bounded worker pool
//! - Collecting the completed records for the snapshot

mod fetcher;
mod parser;
mod pool;
mod source;

pub use fetcher::{build_http_client, fetch_and_extract};
pub use parser::extract_details;
pub use pool::{collect_gathered, GatherFailure, GatherOutcome, Gathered, Gatherer};
pub use source::{limit_from_arg, parse_line, read_sources, SourceReader};

use crate::config::Config;
use crate::storage::{fingerprint, write_snapshot};
use std::io::Cursor;
use std::path::Path;

/// Runs a complete gather: input list in, snapshot file out
///
/// # Arguments
///
/// * `config` - Gather and HTTP settings
/// * `input` - Markdown file listing the apps
/// * `snapshot` - Snapshot file to write; replaced if it exists
/// * `limit` - Maximum number of apps to read; `None` reads them all
///
/// # Returns
///
/// * `Ok(Gathered)` - What was gathered, including per-item failures
/// * `Err(RatingsError)` - The input or snapshot could not be read or written
pub async fn run_gather(
    config: &Config,
    input: &Path,
    snapshot: &Path,
    limit: Option<usize>,
) -> crate::Result<Gathered> {
    let content = std::fs::read(input)?;
    let source_hash = fingerprint(&content);
    tracing::debug!("Input {} has hash {}", input.display(), source_hash);

    let records = read_sources(Cursor::new(content), limit).collect::<std::io::Result<Vec<_>>>()?;
    tracing::info!("Read {} apps from {}", records.len(), input.display());

    let gatherer = Gatherer::from_config(config)?;
    let gathered = collect_gathered(gatherer.gather(records)).await;

    write_snapshot(snapshot, &source_hash, &gathered.records)?;
    Ok(gathered)
}
