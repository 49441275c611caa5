//! Log Store: exercise tracker users and their exercise logs
//!
//! Subjects live in `TABLE_SUBJECTS`; entries live in their own table keyed by
//! subject prefix, so a subject's log is one range scan in append order.

use chrono::{NaiveDate, Utc};
use redb::{Database, ReadableDatabase, ReadableTable};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::{TABLE_LOG_ENTRIES, TABLE_SUBJECTS};
use crate::error::AppError;
use crate::model::{LogEntry, LogQuery, LogReport, Subject};
use crate::validation::{parse_limit, parse_optional_date};

/// Parsed form of [`LogQuery`]
///
/// Both bounds are inclusive.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LogFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl LogFilter {
    /// Fails with `InvalidInput` on an unparseable date or limit
    pub fn parse(query: &LogQuery) -> Result<Self, AppError> {
        Ok(Self {
            from: parse_optional_date("from", query.from.as_deref())?,
            to: parse_optional_date("to", query.to.as_deref())?,
            limit: parse_limit(query.limit.as_deref())?,
        })
    }

    fn admits(&self, date: NaiveDate) -> bool {
        !(self.from.is_some_and(|from| date < from) || self.to.is_some_and(|to| date > to))
    }
}

#[derive(Clone)]
pub struct LogStore {
    db: Arc<Database>,
}

impl LogStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub(crate) fn into_database(self) -> Arc<Database> {
        self.db
    }

    /// Registers a new subject; usernames are not required to be unique
    pub fn create_subject(&self, username: &str) -> Result<Subject, AppError> {
        let subject = Subject {
            id: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        let record_json = serde_json::to_string(&subject)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_SUBJECTS)?;
            table.insert(subject.id.as_str(), record_json.as_str())?;
        }
        write_txn.commit()?;

        tracing::info!(id = %subject.id, "subject created");
        Ok(subject)
    }

    /// All subjects in creation order
    pub fn list_subjects(&self) -> Result<Vec<Subject>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_SUBJECTS)?;

        let mut subjects = Vec::new();
        for row in table.iter()? {
            let (_, value) = row?;
            subjects.push(serde_json::from_str::<Subject>(value.value())?);
        }
        subjects.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(subjects)
    }

    pub fn get_subject(&self, subject_id: &str) -> Result<Subject, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_SUBJECTS)?;
        read_subject(&table, subject_id)?.ok_or_else(subject_not_found)
    }

    /// Appends an exercise to a subject's log
    ///
    /// `date` defaults to the current UTC date. The subject lookup and the
    /// insert run in one write transaction.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `subject_id` does not reference a subject
    pub fn append_log(
        &self,
        subject_id: &str,
        description: &str,
        duration_minutes: i64,
        date: Option<NaiveDate>,
    ) -> Result<(Subject, LogEntry), AppError> {
        let write_txn = self.db.begin_write()?;
        let (subject, entry) = {
            let subjects = write_txn.open_table(TABLE_SUBJECTS)?;
            let subject = read_subject(&subjects, subject_id)?.ok_or_else(subject_not_found)?;

            let entry = LogEntry {
                subject_id: subject.id.clone(),
                description: description.to_string(),
                duration_minutes,
                date: date.unwrap_or_else(|| Utc::now().date_naive()),
            };

            let mut table = write_txn.open_table(TABLE_LOG_ENTRIES)?;
            let (start_key, end_key) = subject_key_range(&subject.id);
            let last_key = table
                .range(start_key.as_str()..end_key.as_str())?
                .next_back()
                .transpose()?
                .map(|(key, _)| key.value().to_string());
            let seq = match last_key {
                Some(key) => parse_sequence(&key)? + 1,
                None => 0,
            };

            let record_json = serde_json::to_string(&entry)?;
            table.insert(entry_key(&subject.id, seq).as_str(), record_json.as_str())?;
            (subject, entry)
        };
        write_txn.commit()?;

        tracing::debug!(subject = %subject.id, date = %entry.date, "log entry appended");
        Ok((subject, entry))
    }

    /// Returns a subject's log filtered by date range and capped by `limit`
    ///
    /// Entries come back in append order, not date order. `count` is the
    /// number of entries returned.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `from`, `to` or `limit` does not parse
    /// - `NotFound` if `subject_id` does not reference a subject
    pub fn query_logs(&self, subject_id: &str, query: &LogQuery) -> Result<LogReport, AppError> {
        let filter = LogFilter::parse(query)?;

        let read_txn = self.db.begin_read()?;
        let subjects = read_txn.open_table(TABLE_SUBJECTS)?;
        let subject = read_subject(&subjects, subject_id)?.ok_or_else(subject_not_found)?;

        let table = read_txn.open_table(TABLE_LOG_ENTRIES)?;
        let (start_key, end_key) = subject_key_range(&subject.id);

        let mut entries = Vec::new();
        for row in table.range(start_key.as_str()..end_key.as_str())? {
            if filter.limit.is_some_and(|max| entries.len() >= max) {
                break;
            }
            let (_, value) = row?;
            let entry: LogEntry = serde_json::from_str(value.value())?;
            if filter.admits(entry.date) {
                entries.push(entry);
            }
        }

        Ok(LogReport {
            username: subject.username,
            count: entries.len(),
            subject_id: subject.id,
            entries,
        })
    }
}

fn subject_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

fn read_subject(
    table: &impl ReadableTable<&'static str, &'static str>,
    subject_id: &str,
) -> Result<Option<Subject>, AppError> {
    let record = table.get(subject_id)?.map(|guard| guard.value().to_string());
    record
        .map(|record_json| serde_json::from_str(&record_json))
        .transpose()
        .map_err(AppError::from)
}

fn entry_key(subject_id: &str, seq: u64) -> String {
    format!("{subject_id}:{seq:020}")
}

/// Bounds covering every entry key of one subject
///
/// '{' sorts after every digit, so `"{id}:".."{id}:{"` spans all sequences.
fn subject_key_range(subject_id: &str) -> (String, String) {
    (format!("{subject_id}:"), format!("{subject_id}:{{"))
}

fn parse_sequence(key: &str) -> Result<u64, AppError> {
    key.rsplit(':')
        .next()
        .and_then(|seq| seq.parse::<u64>().ok())
        .ok_or_else(|| AppError::StoreFailure(format!("malformed log entry key: {key}")))
}
