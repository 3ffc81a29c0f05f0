//! HTTP fetcher implementation
//!
//! This module handles the store page requests, including:
//! - Building the HTTP client with the configured user agent
//! - One GET per app record, never retried
//! - Classifying network failures
//! - Handing successful bodies to the extractor

use crate::config::{GatherConfig, UserAgentConfig};
use crate::gather::parser::extract_details;
use crate::model::AppRecord;
use crate::{FetchError, FetchResult};
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// Certificate validation follows `accept-invalid-certs`, which is on by
/// default because the store pages are served over a chain that is not
/// validated. No timeout is set unless `timeout-secs` is configured.
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `gather` - The gather configuration
///
/// # Example
///
/// ```no_run
/// use check_ratings::config::Config;
/// use check_ratings::gather::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.gather).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    gather: &GatherConfig,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent.agent.as_str())
        .danger_accept_invalid_certs(user_agent.accept_invalid_certs)
        .gzip(true)
        .brotli(true);

    if let Some(secs) = gather.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a record's store page and enriches the record from it
///
/// # Behavior
///
/// | Outcome | Result |
/// |---------|--------|
/// | 2xx response | `Ok`, with every field the page provided |
/// | Non-2xx response | `Ok`, record unchanged |
/// | Timeout / connection / protocol error | `Err(FetchError)` |
/// | Body could not be read | `Err(FetchError::Body)` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `record` - The record to enrich; returned back on success
pub async fn fetch_and_extract(client: &Client, mut record: AppRecord) -> FetchResult<AppRecord> {
    tracing::debug!("Loading {}", record.url);

    let response = client
        .get(&record.url)
        .send()
        .await
        .map_err(|e| FetchError::from_request(&record.url, e))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            "{} returned HTTP {}, leaving {:?} unenriched",
            record.url,
            status.as_u16(),
            record.name
        );
        return Ok(record);
    }

    let body = response.text().await.map_err(|source| FetchError::Body {
        url: record.url.clone(),
        source,
    })?;

    let details = extract_details(&body, &record.url);
    tracing::debug!(
        "{:?} -> found name={:?}",
        record.name,
        details.original_name
    );
    if details.content_rating.is_none() {
        tracing::warn!("Unable to find rating for {:?} ({})", record.name, record.url);
    }

    record.apply(details);
    Ok(record)
}
