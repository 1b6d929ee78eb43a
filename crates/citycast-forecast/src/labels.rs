//! Human-readable labels for dates, times and tick values.
//!
//! None of these fail: input that cannot be parsed comes back unchanged.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Short en-US date, e.g. `Jan 15`. Falls back to the raw string.
pub fn short_date(raw: &str) -> String {
    match parse_calendar_date(raw) {
        Some(date) => date.format("%b %-d").to_string(),
        None => raw.to_string(),
    }
}

/// Wall-clock `HH:MM` of a time stamp. Falls back to the raw string.
pub fn clock_time(raw: &str) -> String {
    parse_date_time(raw)
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// UTC `HH:MM` of an epoch-seconds value.
pub fn epoch_clock_time(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp(seconds.trunc() as i64, 0)
        .map(|time| time.format("%H:%M").to_string())
}

/// Compact numeric label: whole numbers without decimals, others with one.
pub fn tick_label(value: f64) -> String {
    // + 0.0 turns -0.0 into 0.0
    let value = value + 0.0;
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value.round() + 0.0)
    } else {
        format!("{:.1}", value)
    }
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_date_time(raw).map(|time| time.date()))
}

/// Local date-time as written in the string; offsets are kept, not converted.
fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.naive_local());
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
