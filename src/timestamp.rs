//! Date parameter parsing for the timestamp microservice

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::AppError;

/// Response body for `GET /api/{date}`
#[derive(Serialize, Debug, PartialEq)]
pub struct TimestampResponse {
    /// Milliseconds since the Unix epoch
    pub unix: i64,
    /// RFC 7231 style, e.g. `Fri, 25 Dec 2015 00:00:00 GMT`
    pub utc: String,
}

impl From<DateTime<Utc>> for TimestampResponse {
    fn from(instant: DateTime<Utc>) -> Self {
        Self {
            unix: instant.timestamp_millis(),
            utc: instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        }
    }
}

/// Date-time layouts read as UTC, tried in order
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M:%S",
    "%a %b %d %Y %H:%M:%S",
];

/// Date layouts read as midnight UTC. `%b` also accepts full month names.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d %b %Y",
    "%d %b, %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%a %b %d %Y",
    "%a, %d %b %Y",
];

/// Resolves the optional date path parameter to an instant
///
/// - absent or blank: `now`
/// - an integer: milliseconds since the epoch (`2015` is 2015 ms, not a year)
/// - RFC 3339 or RFC 2822
/// - otherwise one of [`DATE_TIME_FORMATS`] or [`DATE_FORMATS`], e.g.
///   `2015-12-25`, `Dec 25 2015`, `05 October 2011, GMT`, read as UTC
pub fn parse_timestamp(raw: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>, AppError> {
    let value = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value,
        None => return Ok(now),
    };

    let invalid = || AppError::InvalidInput("Invalid Date".to_string());

    if is_integer(value) {
        let millis = value.parse::<i64>().map_err(|_| invalid())?;
        return Utc.timestamp_millis_opt(millis).single().ok_or_else(invalid);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let value = strip_utc_suffix(value);
    let date_time = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok());
    let date = || {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    };

    date_time
        .or_else(date)
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}

/// Drops a trailing `GMT`/`UTC` zone name, with or without a comma
fn strip_utc_suffix(value: &str) -> &str {
    for zone in ["GMT", "UTC", "Z"] {
        if let Some(rest) = value.strip_suffix(zone) {
            let rest = rest.trim_end();
            return rest.strip_suffix(',').unwrap_or(rest).trim_end();
        }
    }
    value
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
