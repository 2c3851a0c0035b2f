use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::constants::DATE_FORMAT;

/// A rejected query parameter.
///
/// These are reported to API consumers in-band, so `Display` is the exact
/// user-facing message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryValidationError {
    #[error("Input limit is invalid")]
    InvalidLimit,

    #[error("Input page is invalid")]
    InvalidPage,

    #[error("Input start date is invalid")]
    InvalidStartDate,

    #[error("Input end date is invalid")]
    InvalidEndDate,

    #[error("Input end date is before start date")]
    EndBeforeStart,

    #[error("Symbol is not specified")]
    MissingSymbol,
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a calendar date from user input.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYYMMDD` and ISO-8601 date-times
/// (naive or RFC 3339), keeping only the date part of the latter.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y/%m/%d") {
        return Some(date);
    }
    if let Some(date) = parse_compact(input) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}

// chrono's %Y is greedy, so YYYYMMDD is split by hand.
fn parse_compact(input: &str) -> Option<NaiveDate> {
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = input[0..4].parse().ok()?;
    let month = input[4..6].parse().ok()?;
    let day = input[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whether `input` is present and parses as a date.
pub fn is_date(input: Option<&str>) -> bool {
    input.and_then(parse_date).is_some()
}

/// Whether `end` falls on or after `start`.
pub fn is_date_after(start: NaiveDate, end: NaiveDate) -> bool {
    end >= start
}
