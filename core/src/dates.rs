//! Date parsing policy for spreadsheet exports.
//!
//! Accepted shapes:
//!   - numeric day serials, counted from 1899-12-30 (the Excel epoch)
//!   - textual dates where every non-digit byte acts as a separator
//!
//! A textual date must yield exactly three numeric components. Candidates
//! are tried in order DD/MM/YYYY, MM/DD/YYYY, then YYYY/MM/DD when the
//! first component exceeds 31. Each candidate is validated against the
//! real calendar and the year range [1900, 2100]; the first valid
//! candidate wins, so DD/MM/YYYY is preferred on genuinely ambiguous
//! inputs like `01/02/2024`.
//!
//! Failure to parse is a row-level concern — callers record a warning
//! and drop the row, they never abort.

use crate::record::DateInput;
use chrono::{Datelike, Days, NaiveDate};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Resolve a raw date cell to a calendar date, if possible.
pub fn parse_date(input: &DateInput) -> Option<NaiveDate> {
    match input {
        DateInput::Serial(serial) => parse_serial(*serial),
        DateInput::Text(text) => parse_text(text),
    }
}

fn parse_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_days(Days::new(serial.round() as u64))?;
    ((MIN_YEAR..=MAX_YEAR).contains(&date.year())).then_some(date)
}

fn parse_text(text: &str) -> Option<NaiveDate> {
    let normalized: String = text
        .chars()
        .map(|c| if c.is_ascii_digit() { c } else { '/' })
        .collect();

    let parts: Vec<&str> = normalized.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let nums: Vec<i64> = parts
        .iter()
        .map(|p| p.parse::<i64>().ok())
        .collect::<Option<_>>()?;

    let mut candidates = vec![
        (nums[2], nums[1], nums[0]), // DD/MM/YYYY
        (nums[2], nums[0], nums[1]), // MM/DD/YYYY
    ];
    if nums[0] > 31 {
        candidates.push((nums[0], nums[1], nums[2])); // YYYY/MM/DD
    }

    candidates
        .into_iter()
        .find_map(|(year, month, day)| checked_date(year, month, day))
}

/// Rejects out-of-range components and impossible calendar dates
/// (Feb 30, Apr 31, non-leap Feb 29).
fn checked_date(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let year = i32::try_from(year).ok()?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
