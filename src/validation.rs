//! Input validation and date rendering helpers
//!
//! Everything here is pure so the stores and handlers can share one set of
//! parsing rules.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use url::Url;

use crate::error::AppError;

/// Wire format for calendar dates in requests and storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Human-readable format used in responses, e.g. `Mon Jan 01 2024`
pub const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";

/// Checks that `raw` is an absolute http/https URL with a host
///
/// The submitted text itself must be a well-formed URI: `Url::parse` is
/// lenient (it trims, drops tabs and newlines, escapes spaces, fills in a
/// missing `//`) while the raw string is what gets stored and redirected to.
pub fn validate_web_url(raw: &str) -> Result<(), AppError> {
    let invalid = || AppError::InvalidInput("invalid url".to_string());

    if raw.is_empty() || !raw.chars().all(is_uri_char) || !has_valid_escapes(raw) {
        return Err(invalid());
    }

    // Scheme must be followed directly by a non-empty authority
    let (scheme, rest) = raw.split_once("://").ok_or_else(invalid)?;
    if !(scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")) {
        return Err(invalid());
    }
    if rest.is_empty() || rest.starts_with(['/', '?', '#']) {
        return Err(invalid());
    }

    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// RFC 3986 unreserved, reserved and `%`
fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=%".contains(c)
}

/// Every `%` starts a two-hex-digit escape
fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().all(|(i, b)| {
        *b != b'%'
            || (i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit())
    })
}

/// Parses a calendar date
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 date-times, keeping only the date.
/// `field` names the parameter in the error message.
pub fn parse_calendar_date(field: &str, raw: &str) -> Result<NaiveDate, AppError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::InvalidInput(format!("invalid {field} date: {raw}")))
}

/// Like [`parse_calendar_date`], but absent or blank input yields `None`
pub fn parse_optional_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_calendar_date(field, value).map(Some),
        None => Ok(None),
    }
}

/// Parses the `limit` query parameter; blank means no limit
pub fn parse_limit(raw: Option<&str>) -> Result<Option<usize>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|_| AppError::InvalidInput(format!("invalid limit: {value}"))),
        None => Ok(None),
    }
}

/// A numeric field that may arrive as a JSON number or as text from a form
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(i64),
    Text(String),
}

/// Interprets an exercise duration as whole, non-negative minutes
pub fn parse_duration(raw: &NumberOrText) -> Result<i64, AppError> {
    let minutes = match raw {
        NumberOrText::Number(n) => *n,
        NumberOrText::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::InvalidInput(format!("invalid duration: {text}")))?,
    };

    if minutes < 0 {
        return Err(AppError::InvalidInput(
            "duration must not be negative".to_string(),
        ));
    }
    Ok(minutes)
}

pub fn render_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}
