use crate::model::Rating;
use crate::output::ReportFormat;
use serde::Deserialize;
use std::collections::HashSet;

/// Default size of the fetch worker pool
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Default User-Agent header sent with every store page request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Default report title
pub const DEFAULT_REPORT_TITLE: &str = "App Content Ratings";

/// Main configuration structure for Check-Ratings
///
/// Every section is optional; missing keys take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gather: GatherConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Gather phase configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatherConfig {
    /// Number of store pages fetched concurrently
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Per-request timeout in seconds; no timeout when absent
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,
}

/// HTTP identification and transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// User-Agent header value
    #[serde(default = "default_agent")]
    pub agent: String,

    /// Skip certificate validation for store pages
    #[serde(rename = "accept-invalid-certs", default = "default_true")]
    pub accept_invalid_certs: bool,
}

/// Report phase configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Rating names to leave out of the report
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default)]
    pub format: ReportFormat,

    #[serde(default = "default_title")]
    pub title: String,
}

impl ReportConfig {
    /// Canonicalizes the configured ignore list
    pub fn ignore_set(&self) -> HashSet<Rating> {
        self.ignore
            .iter()
            .map(|name| Rating::canonicalize(name.as_str()))
            .collect()
    }
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            timeout_secs: None,
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            agent: default_agent(),
            accept_invalid_certs: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            format: ReportFormat::default(),
            title: default_title(),
        }
    }
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_title() -> String {
    DEFAULT_REPORT_TITLE.to_string()
}
