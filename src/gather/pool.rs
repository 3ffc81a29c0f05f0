//! Concurrent gatherer
//!
//! Fans store page fetches out over a bounded pool of Tokio tasks and hands
//! results back in completion order. Every record's task is spawned up front;
//! a semaphore caps how many fetch at once. A failed item is reported as a
//! [`GatherFailure`] and never stops its siblings.

use crate::config::Config;
use crate::gather::fetcher::{build_http_client, fetch_and_extract};
use crate::model::AppRecord;
use crate::FetchError;
use futures::stream::{self, Stream, StreamExt};
use futures::FutureExt;
use reqwest::Client;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A record whose fetch failed, tagged with its identity
#[derive(Debug, Error)]
#[error("{name} ({url}): {error}")]
pub struct GatherFailure {
    pub name: String,
    pub url: String,
    #[source]
    pub error: FetchError,
}

/// Outcome of one gather task
pub type GatherOutcome = Result<AppRecord, GatherFailure>;

/// Everything a gather run produced
#[derive(Debug, Default)]
pub struct Gathered {
    /// Completed records, in completion order
    pub records: Vec<AppRecord>,

    /// Items dropped because their fetch failed
    pub failures: Vec<GatherFailure>,
}

/// Bounded worker pool for store page fetches
#[derive(Debug, Clone)]
pub struct Gatherer {
    client: Client,
    max_workers: usize,
}

impl Gatherer {
    /// Creates a gatherer; a `max_workers` of zero is treated as one
    pub fn new(client: Client, max_workers: usize) -> Self {
        Self {
            client,
            max_workers: max_workers.max(1),
        }
    }

    /// Creates a gatherer with a client built from the configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, &config.gather)?;
        Ok(Self::new(client, config.gather.max_workers))
    }

    /// Returns the pool size
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Starts fetching every record and streams the outcomes as they complete
    ///
    /// The input is enumerated eagerly; one task per record is spawned
    /// immediately, at most `max_workers` of them fetching at a time. The
    /// stream ends once every task has been joined. Dropping the stream
    /// early aborts whatever is still running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn gather<I>(&self, records: I) -> impl Stream<Item = GatherOutcome> + Send + 'static
    where
        I: IntoIterator<Item = AppRecord>,
    {
        let permits = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();

        for record in records {
            let client = self.client.clone();
            let permits = Arc::clone(&permits);
            tasks.spawn(gather_one(client, permits, record));
        }

        tracing::info!(
            "Gathering {} apps with {} workers",
            tasks.len(),
            self.max_workers
        );

        stream::unfold(tasks, |mut tasks| async move {
            let outcome = match tasks.join_next().await? {
                Ok(outcome) => outcome,
                Err(e) => Err(GatherFailure {
                    name: UNKNOWN_ITEM.to_string(),
                    url: UNKNOWN_ITEM.to_string(),
                    error: FetchError::Aborted(e.to_string()),
                }),
            };
            Some((outcome, tasks))
        })
    }
}

/// Identity used when a task was lost without reporting back
const UNKNOWN_ITEM: &str = "<unknown>";

/// Fetches one record while holding a worker slot
async fn gather_one(client: Client, permits: Arc<Semaphore>, record: AppRecord) -> GatherOutcome {
    let name = record.name.clone();
    let url = record.url.clone();

    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            return Err(GatherFailure {
                name,
                url,
                error: FetchError::Aborted(e.to_string()),
            })
        }
    };

    let result = AssertUnwindSafe(fetch_and_extract(&client, record))
        .catch_unwind()
        .await;

    match result {
        Ok(Ok(record)) => Ok(record),
        Ok(Err(error)) => Err(GatherFailure { name, url, error }),
        Err(panic) => Err(GatherFailure {
            name,
            error: FetchError::Panicked {
                url: url.clone(),
                message: panic_message(panic.as_ref()),
            },
            url,
        }),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Drains gather outcomes, logging each one
///
/// Successes are logged at info level with their raw content rating;
/// failures at error level with the item's name and URL. Failures are kept
/// apart from the records, so callers can persist only completed items.
pub async fn collect_gathered<S>(outcomes: S) -> Gathered
where
    S: Stream<Item = GatherOutcome>,
{
    let mut gathered = Gathered::default();
    let start_time = Instant::now();
    let mut outcomes = Box::pin(outcomes);

    while let Some(outcome) = outcomes.next().await {
        match outcome {
            Ok(record) => {
                tracing::info!(
                    "{:?} has content rating {:?}",
                    record.name,
                    record.content_rating
                );
                gathered.records.push(record);
            }
            Err(failure) => {
                tracing::error!("{}", failure);
                gathered.failures.push(failure);
            }
        }

        let done = gathered.records.len() + gathered.failures.len();
        if done % 10 == 0 {
            let rate = done as f64 / start_time.elapsed().as_secs_f64().max(f64::EPSILON);
            tracing::debug!("Progress: {} apps done, {:.2} apps/sec", done, rate);
        }
    }

    tracing::info!(
        "Gathered {} apps ({} failed) in {:?}",
        gathered.records.len(),
        gathered.failures.len(),
        start_time.elapsed()
    );

    gathered
}
