//! Output module for building and rendering rating reports
//!
//! This module handles:
//! - Filtering gathered apps against an ignore-set and sorting them by rating
//! - Rendering the result as AsciiDoc or Markdown
//! - Per-rating statistics

mod asciidoc;
mod markdown;
pub mod stats;
mod traits;

pub use asciidoc::AsciiDocRenderer;
pub use markdown::MarkdownRenderer;
pub use stats::{print_statistics, rating_statistics, RatingStatistics};
pub use traits::{OutputError, OutputResult, ReportRenderer};

use crate::model::{AppRecord, Rating};
use crate::storage::{Snapshot, SnapshotMeta};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Report document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    #[value(name = "asciidoc")]
    AsciiDoc,
    #[value(name = "markdown")]
    Markdown,
}

impl ReportFormat {
    /// Returns the renderer for this format
    pub fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self {
            Self::AsciiDoc => Box::new(AsciiDocRenderer),
            Self::Markdown => Box::new(MarkdownRenderer),
        }
    }
}

/// Filters and sorts gathered apps for reporting
///
/// An app is dropped iff `ignore` is non-empty and contains the app's
/// canonical rating. The rest are sorted by rating weight, most restrictive
/// first. The sort is stable, so apps with equal ratings keep their
/// relative order.
///
/// # Example
///
/// ```
/// use check_ratings::{build_report, AppRecord, Rating};
/// use std::collections::HashSet;
///
/// let mut mature = AppRecord::new("Mature App", "http://example.test/m").unwrap();
/// mature.content_rating = Some("Mature".to_string());
/// let mut general = AppRecord::new("General App", "http://example.test/g").unwrap();
/// general.content_rating = Some("General".to_string());
///
/// let sorted = build_report(vec![general, mature], &HashSet::new());
/// assert_eq!(sorted[0].rating(), Rating::Mature);
/// ```
pub fn build_report<I>(gathered: I, ignore: &HashSet<Rating>) -> Vec<AppRecord>
where
    I: IntoIterator<Item = AppRecord>,
{
    let mut apps: Vec<AppRecord> = gathered
        .into_iter()
        .filter(|app| {
            let keep = app.has_valid_rating(ignore);
            tracing::debug!(
                "name={:?}, content_rating={:?} -> keep={}",
                app.name,
                app.content_rating,
                keep
            );
            keep
        })
        .collect();

    apps.sort_by_key(|app| app.rating());
    tracing::info!("Have {} apps", apps.len());
    apps
}

/// A filtered, sorted report ready for rendering
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,

    /// Apps in rating order, most restrictive first
    pub apps: Vec<AppRecord>,

    /// Ratings left out, most restrictive first
    pub ignored: Vec<Rating>,

    /// Where the apps came from, when known
    pub meta: Option<SnapshotMeta>,
}

impl Report {
    /// Builds a report from gathered apps
    pub fn new<I>(title: &str, gathered: I, ignore: &HashSet<Rating>) -> Self
    where
        I: IntoIterator<Item = AppRecord>,
    {
        let mut ignored: Vec<Rating> = ignore.iter().copied().collect();
        ignored.sort();

        Self {
            title: title.to_string(),
            apps: build_report(gathered, ignore),
            ignored,
            meta: None,
        }
    }

    /// Builds a report from a loaded snapshot
    pub fn from_snapshot(title: &str, snapshot: Snapshot, ignore: &HashSet<Rating>) -> Self {
        let mut report = Self::new(title, snapshot.records, ignore);
        report.meta = Some(snapshot.meta);
        report
    }

    /// Groups apps by rating, in rating order
    ///
    /// Within a group apps are re-sorted by name, case-insensitive.
    pub fn groups(&self) -> Vec<(Rating, Vec<&AppRecord>)> {
        let mut groups: Vec<(Rating, Vec<&AppRecord>)> = Vec::new();

        for app in &self.apps {
            let rating = app.rating();
            match groups.last_mut() {
                Some((current, members)) if *current == rating => members.push(app),
                _ => groups.push((rating, vec![app])),
            }
        }

        for (_, members) in &mut groups {
            members.sort_by_key(|app| app.name_order());
        }
        groups
    }

    /// Per-rating counts of the reported apps
    pub fn statistics(&self) -> RatingStatistics {
        rating_statistics(&self.apps)
    }

    /// Labels of the ignored ratings, or "none"
    pub fn ignored_labels(&self) -> String {
        if self.ignored.is_empty() {
            "none".to_string()
        } else {
            self.ignored
                .iter()
                .map(|rating| rating.label())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Returns the report file path, adding the format's extension when the
/// given path has none
pub fn report_path(output_path: &Path, renderer: &dyn ReportRenderer) -> PathBuf {
    let mut path = output_path.to_path_buf();
    if path.extension().is_none() {
        path.set_extension(renderer.extension());
    }
    path
}

/// Renders a report and writes it to a file
///
/// # Arguments
///
/// * `report` - The report to render
/// * `renderer` - The output format
/// * `output_path` - Path where the document should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_report(
    report: &Report,
    renderer: &dyn ReportRenderer,
    output_path: &Path,
) -> OutputResult<()> {
    let document = renderer.render(report);

    let mut file = File::create(output_path)?;
    file.write_all(document.as_bytes())?;
    file.flush()?;

    Ok(())
}
