//! Field validation rules for posts.

use chrono::{NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Wall-clock format accepted for `published_at`.
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static PUBLISHED_AT_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("compile published_at regex")
});

/// A single failed validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Content is required")]
    ContentRequired,

    #[error("Invalid date and time")]
    InvalidPublishedAt,
}

/// Strictly parse a `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// Out-of-range fields (month 13, day 32, hour 24) and leap seconds are
/// rejected rather than rolled over into the next unit.
pub fn parse_published_at(value: &str) -> Option<NaiveDateTime> {
    if !PUBLISHED_AT_SHAPE.is_match(value) {
        return None;
    }

    let parsed = NaiveDateTime::parse_from_str(value, PUBLISHED_AT_FORMAT).ok()?;

    // chrono represents :60 as a leap second instead of failing
    if parsed.nanosecond() >= 1_000_000_000 {
        return None;
    }

    Some(parsed)
}

/// Format a stored timestamp back into the wall-clock form.
pub fn format_published_at(value: &NaiveDateTime) -> String {
    value.format(PUBLISHED_AT_FORMAT).to_string()
}
