//! Display formatting for money, dates and times (en-GB conventions).
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse an API timestamp: RFC 3339, or ISO 8601 without an offset.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// `Sat 1 Mar`; unparseable input is shown as-is.
#[must_use]
pub fn format_day(value: &str) -> String {
    parse_timestamp(value).map_or_else(
        || value.to_string(),
        |at| at.format("%a %-d %b").to_string(),
    )
}

/// `1 Mar`, as on event cards.
#[must_use]
pub fn format_short_day(value: &str) -> String {
    parse_timestamp(value).map_or_else(|| value.to_string(), |at| at.format("%-d %b").to_string())
}

/// `10:00`
#[must_use]
pub fn format_time(value: &str) -> String {
    parse_timestamp(value).map_or_else(String::new, |at| at.format("%H:%M").to_string())
}

/// `1 Mar 2025, 10:00`, for booking timestamps.
#[must_use]
pub fn format_date_time(value: &str) -> String {
    parse_timestamp(value).map_or_else(
        || value.to_string(),
        |at| at.format("%-d %b %Y, %H:%M").to_string(),
    )
}

/// Pence as pounds: `1200` → `£12.00`.
#[must_use]
pub fn format_gbp(pence: i64) -> String {
    let sign = if pence < 0 { "-" } else { "" };
    let pence = pence.unsigned_abs();
    format!("{sign}£{}.{:02}", pence / 100, pence % 100)
}

/// Card tag for an event: `Free` or its adult price.
#[must_use]
pub fn price_tag(is_free: bool, pence: i64) -> String {
    if is_free {
        String::from("Free")
    } else {
        format_gbp(pence)
    }
}

/// Split a timestamp into the `YYYY-MM-DD` and `HH:MM` values of a date/time input pair.
#[must_use]
pub fn split_date_time(value: &str) -> Option<(String, String)> {
    parse_timestamp(value).map(|at| {
        (
            at.format("%Y-%m-%d").to_string(),
            at.format("%H:%M").to_string(),
        )
    })
}
