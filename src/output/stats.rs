//! Rating statistics for a set of app records
//!
//! Used by the `stats` command and by the report summary tables.

use crate::model::{AppRecord, Rating};
use std::collections::HashMap;

/// Per-rating counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingStatistics {
    /// Number of records counted
    pub total: u64,

    /// Records with at least one field taken from their store page
    pub enriched: u64,

    /// Count per rating, most restrictive first; zero counts omitted
    pub by_rating: Vec<(Rating, u64)>,
}

impl RatingStatistics {
    /// Returns the count for one rating
    pub fn count(&self, rating: Rating) -> u64 {
        self.by_rating
            .iter()
            .find(|(r, _)| *r == rating)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Counts records by canonical rating
pub fn rating_statistics<'a, I>(records: I) -> RatingStatistics
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    let mut counts: HashMap<Rating, u64> = HashMap::new();
    let mut stats = RatingStatistics::default();

    for record in records {
        stats.total += 1;
        if record.is_enriched() {
            stats.enriched += 1;
        }
        *counts.entry(record.rating()).or_insert(0) += 1;
    }

    stats.by_rating = Rating::all()
        .into_iter()
        .filter_map(|rating| counts.get(&rating).map(|count| (rating, *count)))
        .collect();

    stats
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &RatingStatistics) {
    println!("=== Snapshot Statistics ===\n");
    println!("Total apps: {}", stats.total);
    println!("Enriched from store page: {}", stats.enriched);
    println!(
        "Without store data: {}\n",
        stats.total.saturating_sub(stats.enriched)
    );

    println!("Apps by rating:");
    for (rating, count) in &stats.by_rating {
        println!("  {:<20} {}", rating.label(), count);
    }
}
