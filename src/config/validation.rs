use crate::config::types::{Config, GatherConfig, ReportConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_gather_config(&config.gather)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_report_config(&config.report)?;
    Ok(())
}

/// Validates gather configuration
fn validate_gather_config(config: &GatherConfig) -> Result<(), ConfigError> {
    validate_max_workers(config.max_workers)?;

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates a worker pool size, from the config file or the command line
pub fn validate_max_workers(max_workers: usize) -> Result<(), ConfigError> {
    if !(1..=100).contains(&max_workers) {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and 100, got {}",
            max_workers
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    // Must be usable as a header value
    if config.agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user agent must not contain control characters, got {:?}",
            config.agent
        )));
    }

    Ok(())
}

/// Validates report configuration
fn validate_report_config(config: &ReportConfig) -> Result<(), ConfigError> {
    if config.title.trim().is_empty() {
        return Err(ConfigError::Validation(
            "report title cannot be empty".to_string(),
        ));
    }

    if let Some(blank) = config.ignore.iter().position(|r| r.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "ignore entry {} is empty",
            blank
        )));
    }

    Ok(())
}
