//! Title and output filename derivation

use crate::markdown::extract_title;
use chrono::{DateTime, Utc};

/// Title of the document: its first level-1 heading, or `default_title`
pub fn derive_title(source: &str, default_title: &str) -> String {
    extract_title(source).unwrap_or_else(|| default_title.to_string())
}

/// Lowercase the title and replace every character outside `[a-z0-9]` with `-`
///
/// Replacement is one-for-one per `char`, so an emoji becomes a single
/// hyphen; runs of hyphens are kept.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect()
}

/// `YYYY-MM-DDTHH-mm-ss` in UTC, safe for filenames
pub fn file_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// `<slug>-<timestamp>.pdf`
pub fn output_filename(title: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}.pdf", slugify(title), file_timestamp(now))
}
