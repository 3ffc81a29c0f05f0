//! Configuration module for Check-Ratings
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so the tool also runs
//! without one.
//!
//! # Example
//!
//! ```no_run
//! use check_ratings::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ratings.toml")).unwrap();
//! println!("Fetching with {} workers", config.gather.max_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, GatherConfig, ReportConfig, UserAgentConfig, DEFAULT_MAX_WORKERS,
    DEFAULT_REPORT_TITLE, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate_max_workers;
