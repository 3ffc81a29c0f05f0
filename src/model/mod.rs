//! Domain model for app content ratings
//!
//! # Components
//!
//! - `Rating`: canonical content-rating tiers with a fixed sort weight
//! - `AppRecord`: one app reference, enriched from its store page
//! - `Developer`: the developer credited on a store page

mod app;
mod rating;

pub use app::{AppRecord, Developer, PageDetails};
pub use rating::{normalize_label, Rating, RatingText};
