//! Store page extraction
//!
//! This module pulls the fields we care about out of a store page:
//! - Title as rendered by the store (`h1[itemprop=name]`)
//! - Developer name and profile link
//! - Content rating text
//! - Description (`meta`-style `content` attribute)
//! - Star rating
//!
//! Every field is looked up independently, so a page missing one of them
//! still yields the others. The HTML parser is lenient and never fails.

use crate::model::{Developer, PageDetails};
use scraper::{ElementRef, Html, Selector};
use url::Url;

const TITLE_SELECTOR: &str = r#"h1[itemprop="name"] > span"#;
const DEVELOPER_SELECTOR: &str = r#"a[href^="/store/apps/dev"]"#;
const CONTENT_RATING_SELECTOR: &str = r#"[itemprop="contentRating"] > span"#;
const DESCRIPTION_SELECTOR: &str = r#"[itemprop="description"]"#;
const STAR_RATING_SELECTOR: &str = r#"[itemprop="starRating"] > div"#;

/// Extracts store page details from an HTML body
///
/// # Arguments
///
/// * `html` - The page body
/// * `base_url` - The page URL, used to resolve the developer profile link
///
/// # Example
///
/// ```
/// use check_ratings::gather::extract_details;
///
/// let html = r#"<div itemprop="contentRating"><span>Mature</span></div>"#;
/// let details = extract_details(html, "http://example.test/app");
/// assert_eq!(details.content_rating.as_deref(), Some("Mature"));
/// assert_eq!(details.developer, None);
/// ```
pub fn extract_details(html: &str, base_url: &str) -> PageDetails {
    let document = Html::parse_document(html);

    PageDetails {
        original_name: select_text(&document, TITLE_SELECTOR),
        developer: extract_developer(&document, base_url),
        content_rating: select_text(&document, CONTENT_RATING_SELECTOR),
        description: select_attr(&document, DESCRIPTION_SELECTOR, "content"),
        star_rating: extract_star_rating(&document),
    }
}

/// Returns the trimmed text of the first element matching `selector`
fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next().and_then(element_text)
}

/// Returns the trimmed attribute value of the first element matching `selector`
fn select_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Extracts the developer from the first developer profile link
///
/// The name comes from the link's `span` child; without it there is no
/// developer.
fn extract_developer(document: &Html, base_url: &str) -> Option<Developer> {
    let link_selector = Selector::parse(DEVELOPER_SELECTOR).ok()?;
    let span_selector = Selector::parse("span").ok()?;

    let link = document.select(&link_selector).next()?;
    let href = link.value().attr("href")?;
    let name = link.select(&span_selector).next().and_then(element_text)?;

    Some(Developer {
        name,
        url: resolve_link(href, base_url),
    })
}

/// Resolves a possibly relative link against the page URL
///
/// Falls back to the raw href when either side doesn't parse.
fn resolve_link(href: &str, base_url: &str) -> String {
    Url::parse(base_url)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extracts and parses the star rating; unparseable text leaves it unset
fn extract_star_rating(document: &Html) -> Option<f64> {
    let text = select_text(document, STAR_RATING_SELECTOR)?;
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            tracing::debug!("Ignoring unparseable star rating {:?}", text);
            None
        }
    }
}
