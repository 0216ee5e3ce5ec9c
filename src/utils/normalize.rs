//! Canonical forms for event and booking fields
//!
//! These functions are applied right before a record is written to the
//! store, on creation and on update. They never fail: input that cannot be
//! parsed is passed through unchanged.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("slug character class is valid"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("hyphen pattern is valid"));

/// `H:MM` / `HH:MM` with an optional AM/PM marker
static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})(\s*(AM|PM))?$").expect("clock time pattern is valid")
});

/// Derive a URL slug from an event title.
///
/// Lower-cases and trims the title, drops everything that is not a
/// lower-case ASCII letter, digit, whitespace or hyphen, turns whitespace
/// runs into single hyphens and strips hyphens from both ends.
///
/// Distinct titles may produce the same slug; uniqueness is the store's job.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(lowered.trim(), "");
    let hyphenated = WHITESPACE_RUN.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Normalize an ISO calendar date to `YYYY-MM-DD`.
///
/// Non-padded components such as `2024-1-5` are accepted. Signs and
/// whitespace are not. Anything that does not parse is returned as given.
pub fn normalize_date(input: &str) -> String {
    let plain = input.starts_with(|c: char| c.is_ascii_digit())
        && input.chars().all(|c| c.is_ascii_digit() || c == '-');
    if !plain {
        return input.to_string();
    }

    match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => input.to_string(),
    }
}

/// Normalize a time of day to 24-hour `HH:MM`.
///
/// Accepts `H:MM` and `HH:MM`, optionally followed by `AM`/`PM` in any case.
/// Falls back to a strict ISO local time parse, then to returning the input
/// unchanged.
pub fn normalize_time(input: &str) -> String {
    if let Some(time) = parse_clock_time(input.trim()) {
        return time;
    }

    match NaiveTime::parse_from_str(input, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
    {
        Ok(time) => time.format("%H:%M").to_string(),
        Err(_) => input.to_string(),
    }
}

fn parse_clock_time(input: &str) -> Option<String> {
    let captures = CLOCK_TIME.captures(input)?;

    let mut hours: u32 = captures[1].parse().ok()?;
    let minutes: u32 = captures[2].parse().ok()?;

    match captures.get(4).map(|m| m.as_str().to_ascii_uppercase()) {
        Some(period) if period == "PM" && hours != 12 => hours += 12,
        Some(period) if period == "AM" && hours == 12 => hours = 0,
        _ => {}
    }

    if hours <= 23 && minutes <= 59 {
        Some(format!("{:02}:{:02}", hours, minutes))
    } else {
        None
    }
}

/// Trim and lower-case an email address
pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}
