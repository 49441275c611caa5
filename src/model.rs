//! Data models for the service
//!
//! Stored records come first, followed by the request and response bodies of
//! each API. Response field names follow the public wire format (`_id`,
//! `original_url`, ...), which is why some of them differ from the record
//! fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{render_date, NumberOrText};

// ---------------------------------------------------------------------------
// Stored records
// ---------------------------------------------------------------------------

/// A short token mapped to the URL it redirects to
///
/// Stored in `TABLE_LINKS` keyed by `token`. Never updated or deleted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkMapping {
    pub token: String,

    /// Exactly as submitted; no normalization is applied
    pub original_url: String,

    pub created_at: DateTime<Utc>,
}

/// A user of the exercise tracker
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// One logged exercise
///
/// `date` has day granularity and is kept structured; it is only turned into
/// a string when rendered in a response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub subject_id: String,
    pub description: String,
    pub duration_minutes: i64,
    pub date: NaiveDate,
}

/// Result of a log query for one subject
#[derive(Debug, Clone, PartialEq)]
pub struct LogReport {
    pub username: String,
    pub count: usize,
    pub subject_id: String,
    pub entries: Vec<LogEntry>,
}

// ---------------------------------------------------------------------------
// URL shortener
// ---------------------------------------------------------------------------

/// Request payload for `POST /api/shorturl`
///
/// A missing `url` deserializes as empty and is reported as an invalid URL.
#[derive(Deserialize, Debug)]
pub struct ShortenRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize, Debug)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: String,
}

impl From<LinkMapping> for ShortenResponse {
    fn from(mapping: LinkMapping) -> Self {
        Self {
            original_url: mapping.original_url,
            short_url: mapping.token,
        }
    }
}

// ---------------------------------------------------------------------------
// Exercise tracker
// ---------------------------------------------------------------------------

/// Request payload for `POST /api/users`
#[derive(Deserialize, Debug)]
pub struct CreateUserRequest {
    pub username: String,
}

#[derive(Serialize, Debug)]
pub struct UserResponse {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl From<Subject> for UserResponse {
    fn from(subject: Subject) -> Self {
        Self {
            username: subject.username,
            id: subject.id,
        }
    }
}

/// Request payload for `POST /api/users/{id}/exercises`
///
/// # Example
/// ```json
/// { "description": "run", "duration": 30, "date": "2024-01-01" }
/// ```
#[derive(Deserialize, Debug)]
pub struct ExerciseRequest {
    pub description: String,

    /// Whole minutes; forms send it as text
    pub duration: NumberOrText,

    /// `YYYY-MM-DD`; absent or blank means today
    pub date: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ExerciseResponse {
    pub username: String,
    pub description: String,
    pub duration: i64,
    pub date: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl ExerciseResponse {
    pub fn new(subject: Subject, entry: LogEntry) -> Self {
        Self {
            username: subject.username,
            description: entry.description,
            duration: entry.duration_minutes,
            date: render_date(entry.date),
            id: subject.id,
        }
    }
}

/// Query parameters for `GET /api/users/{id}/logs`
///
/// Kept as raw strings so parse failures surface as our own 400 body.
///
/// # Example
/// Query string: `?from=2020-01-01&to=2020-12-31&limit=5`
#[derive(Deserialize, Debug, Default, Clone)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct LogItem {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl From<LogEntry> for LogItem {
    fn from(entry: LogEntry) -> Self {
        Self {
            description: entry.description,
            duration: entry.duration_minutes,
            date: render_date(entry.date),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct LogResponse {
    pub username: String,
    pub count: usize,
    #[serde(rename = "_id")]
    pub id: String,
    pub log: Vec<LogItem>,
}

impl From<LogReport> for LogResponse {
    fn from(report: LogReport) -> Self {
        Self {
            username: report.username,
            count: report.count,
            id: report.subject_id,
            log: report.entries.into_iter().map(LogItem::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Misc endpoints
// ---------------------------------------------------------------------------

#[derive(Serialize, Debug)]
pub struct WhoamiResponse {
    pub ipaddress: Option<String>,
    pub language: Option<String>,
    pub software: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct GreetingResponse {
    pub greeting: &'static str,
}
