//! Content-rating tiers and the canonicalization of free-text rating labels
//!
//! Store pages render their content rating as loosely formatted text
//! ("Rated for 3+", "Parental Guidance", ...). This module maps that text onto
//! a closed set of tiers that can be ordered from most to least restrictive.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A canonical content-rating tier
///
/// Tiers order by [`Rating::weight`], ascending, which puts the most
/// restrictive tier first and the unknown tier last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    /// No rating was found, or the text matched no known tier
    Unknown,
    General,
    ParentalGuidance,
    RatedFor3,
    RatedFor7,
    RatedFor12,
    RestrictedTo15,
    RatedFor16,
    Mature,
}

/// Identifier lookup, built on first use
static IDENTIFIERS: Lazy<HashMap<&'static str, Rating>> = Lazy::new(|| {
    Rating::all()
        .into_iter()
        .map(|rating| (rating.identifier(), rating))
        .collect()
});

impl Rating {
    /// Returns the sort weight of this tier
    ///
    /// Lower weights are more restrictive. The unknown tier has weight 0 and
    /// therefore sorts after every known tier.
    pub fn weight(&self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::General => -100,
            Self::ParentalGuidance => -150,
            Self::RatedFor3 => -200,
            Self::RatedFor7 => -300,
            Self::RatedFor12 => -400,
            Self::RestrictedTo15 => -500,
            Self::RatedFor16 => -600,
            Self::Mature => -800,
        }
    }

    /// Returns the canonical identifier of this tier
    ///
    /// This is the form normalized rating text must match exactly.
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Unknown => "_Unknown",
            Self::General => "General",
            Self::ParentalGuidance => "Parental_Guidance",
            Self::RatedFor3 => "Rated_for_3",
            Self::RatedFor7 => "Rated_for_7",
            Self::RatedFor12 => "Rated_for_12",
            Self::RestrictedTo15 => "Restricted_to_15",
            Self::RatedFor16 => "Rated_for_16",
            Self::Mature => "Mature",
        }
    }

    /// Looks up a tier by its canonical identifier (case-sensitive)
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        IDENTIFIERS.get(identifier).copied()
    }

    /// Canonicalizes raw rating text into a tier
    ///
    /// Missing input, text that matches no known tier, and input that is not
    /// text at all (raw bytes) all map to [`Rating::Unknown`]. This never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use check_ratings::model::Rating;
    ///
    /// assert_eq!(Rating::canonicalize("Rated for 3+"), Rating::RatedFor3);
    /// assert_eq!(Rating::canonicalize(&None::<&str>), Rating::Unknown);
    /// ```
    pub fn canonicalize<T: RatingText + ?Sized>(raw: &T) -> Self {
        raw.rating_text()
            .map(normalize_label)
            .and_then(|token| Self::from_identifier(&token))
            .unwrap_or(Self::Unknown)
    }

    /// Renders the human-readable label of this tier
    ///
    /// Known tiers render so that canonicalizing the label yields the same
    /// tier again: `Rated_for_3` becomes "Rated for 3+".
    pub fn label(&self) -> String {
        if *self == Self::Unknown {
            return "Unknown".to_string();
        }

        let identifier = self.identifier();
        let spaced = identifier.replace('_', " ");
        if identifier.ends_with(|c: char| c.is_ascii_digit()) {
            format!("{}+", spaced)
        } else {
            spaced
        }
    }

    /// Returns every tier, most restrictive first
    pub fn all() -> [Self; 9] {
        [
            Self::Mature,
            Self::RatedFor16,
            Self::RestrictedTo15,
            Self::RatedFor12,
            Self::RatedFor7,
            Self::RatedFor3,
            Self::ParentalGuidance,
            Self::General,
            Self::Unknown,
        ]
    }
}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.weight().cmp(&other.weight())
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Rating {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::canonicalize(s))
    }
}

/// Normalizes rating text into identifier form
///
/// Drops the trailing run of non-alphanumeric characters, then collapses
/// every remaining run of non-alphanumeric characters into a single `_`.
pub fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(|c: char| !c.is_alphanumeric());

    let mut token = String::with_capacity(trimmed.len());
    let mut in_separator = false;
    for c in trimmed.chars() {
        if c.is_alphanumeric() {
            token.push(c);
            in_separator = false;
        } else if !in_separator {
            token.push('_');
            in_separator = true;
        }
    }
    token
}

/// Input accepted by [`Rating::canonicalize`]
///
/// Anything that is not text yields `None` and canonicalizes to the unknown
/// tier.
pub trait RatingText {
    fn rating_text(&self) -> Option<&str>;
}

impl RatingText for str {
    fn rating_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl RatingText for String {
    fn rating_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: RatingText> RatingText for Option<T> {
    fn rating_text(&self) -> Option<&str> {
        self.as_ref().and_then(|text| text.rating_text())
    }
}

impl<T: RatingText + ?Sized> RatingText for &T {
    fn rating_text(&self) -> Option<&str> {
        (**self).rating_text()
    }
}

impl RatingText for [u8] {
    fn rating_text(&self) -> Option<&str> {
        None
    }
}

impl<const N: usize> RatingText for [u8; N] {
    fn rating_text(&self) -> Option<&str> {
        None
    }
}

impl RatingText for Vec<u8> {
    fn rating_text(&self) -> Option<&str> {
        None
    }
}
