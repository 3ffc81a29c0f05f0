//! App records gathered from store pages

use crate::model::rating::Rating;
use std::collections::HashSet;
use url::Url;

/// The developer credited on a store page
#[derive(Debug, Clone, PartialEq)]
pub struct Developer {
    /// Display name
    pub name: String,

    /// Profile link, absolute when it could be resolved
    pub url: String,
}

/// One app reference and whatever its store page revealed
#[derive(Debug, Clone, PartialEq)]
pub struct AppRecord {
    /// Display name as given in the input list (trimmed)
    pub name: String,

    /// Store page URL; identifies the record
    pub url: String,

    /// Content rating text as scraped
    pub content_rating: Option<String>,

    /// Description from the page metadata
    pub description: Option<String>,

    /// Title as the store page renders it
    pub original_name: Option<String>,

    pub developer: Option<Developer>,

    /// Average star rating
    pub star_rating: Option<f64>,
}

/// Fields extracted from one fetched store page
///
/// Every field is independent; any subset may be present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageDetails {
    pub original_name: Option<String>,
    pub developer: Option<Developer>,
    pub content_rating: Option<String>,
    pub description: Option<String>,
    pub star_rating: Option<f64>,
}

impl AppRecord {
    /// Creates a record with only its identity set
    ///
    /// Returns `None` when either the name or the URL is blank after trimming.
    pub fn new(name: &str, url: &str) -> Option<Self> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() || url.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            url: url.to_string(),
            content_rating: None,
            description: None,
            original_name: None,
            developer: None,
            star_rating: None,
        })
    }

    /// Returns the canonical rating derived from `content_rating`
    pub fn rating(&self) -> Rating {
        Rating::canonicalize(&self.content_rating)
    }

    /// Returns false iff `ignore` is non-empty and contains this record's rating
    pub fn has_valid_rating(&self, ignore: &HashSet<Rating>) -> bool {
        ignore.is_empty() || !ignore.contains(&self.rating())
    }

    /// Applies extracted page details
    ///
    /// Fields already set are left alone, so each field is written at most once.
    pub fn apply(&mut self, details: PageDetails) {
        self.original_name = self.original_name.take().or(details.original_name);
        self.developer = self.developer.take().or(details.developer);
        self.content_rating = self.content_rating.take().or(details.content_rating);
        self.description = self.description.take().or(details.description);
        self.star_rating = self.star_rating.or(details.star_rating);
    }

    /// Returns true if any page-derived field is set
    pub fn is_enriched(&self) -> bool {
        self.content_rating.is_some()
            || self.description.is_some()
            || self.original_name.is_some()
            || self.developer.is_some()
            || self.star_rating.is_some()
    }

    /// Returns the store identifier from the URL query
    ///
    /// Looks at the `id` parameter first, then `q`. Keys and values are
    /// compared and returned lower-cased.
    pub fn store_id(&self) -> Option<String> {
        let url = Url::parse(&self.url).ok()?;
        let params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
            .collect();

        let id = ["id", "q"].iter().find_map(|key| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        });
        tracing::trace!("Store id for {}: url={} -> {:?}", self.name, self.url, id);
        id
    }

    /// Sort key for ordering by name, case-insensitive
    pub fn name_order(&self) -> String {
        self.name.to_lowercase()
    }
}
