//! Report renderer trait and output errors

use crate::output::Report;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report renderers
///
/// Renderers receive apps already filtered and sorted by rating; they may
/// group or re-sort them for display, but must not drop any.
pub trait ReportRenderer {
    /// Renders the complete report document
    fn render(&self, report: &Report) -> String;

    /// File extension conventionally used for this format
    fn extension(&self) -> &'static str;
}
