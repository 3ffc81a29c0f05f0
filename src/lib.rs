//! Check-Ratings: content-rating report for a list of store apps
//!
//! This crate reads a markdown list of app store links, fetches every store
//! page concurrently, extracts the content rating and related metadata, and
//! later renders a report of the apps whose rating is not on an ignore list.
//!
//! The work happens in two phases joined by a snapshot file:
//! `gather` (fetch and enrich, write snapshot) and `report` (read snapshot,
//! filter, sort, render).

pub mod config;
pub mod gather;
pub mod model;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Check-Ratings operations
#[derive(Debug, Error)]
pub enum RatingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] storage::SnapshotError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Failure of a single store page fetch
///
/// These never abort a gather run; they are reported and the item dropped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Fetch task for {url} panicked: {message}")]
    Panicked { url: String, message: String },

    #[error("Fetch task did not complete: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Classifies a request error the way the fetcher reports it
    pub fn from_request(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            Self::Timeout { url }
        } else if source.is_connect() {
            Self::Connect { url, source }
        } else {
            Self::Http { url, source }
        }
    }
}

/// Result type alias for Check-Ratings operations
pub type Result<T> = std::result::Result<T, RatingsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for a single page fetch
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use gather::{collect_gathered, read_sources, GatherFailure, Gathered, Gatherer};
pub use model::{AppRecord, Developer, Rating};
pub use output::{build_report, Report};
