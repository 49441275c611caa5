//! Database initialization, table definitions and shared application state
//!
//! This module handles the setup of the embedded redb database and owns the
//! [`AppState`] that is injected into every handler.

use redb::{Database, TableDefinition};
use std::sync::Arc;

use crate::error::AppError;
use crate::generator::{RandomTokenGenerator, TokenGenerator};
use crate::links::LinkStore;
use crate::logs::LogStore;

/// Short link mappings
///
/// Key: token (e.g. "aB3dE9x")
/// Value: JSON-serialized LinkMapping
pub const TABLE_LINKS: TableDefinition<&str, &str> = TableDefinition::new("links_v1");

/// Exercise tracker users
///
/// Key: subject id (UUID, simple hex form)
/// Value: JSON-serialized Subject
pub const TABLE_SUBJECTS: TableDefinition<&str, &str> = TableDefinition::new("subjects_v1");

/// Exercise log entries, grouped by subject
///
/// Key: composite "{subject_id}:{seq}" with `seq` zero-padded to 20 digits
/// Value: JSON-serialized LogEntry
///
/// Example:
/// - Key: "9f1c...e2:00000000000000000003"
/// - Value: '{"subject_id":"9f1c...e2","description":"run",...}'
///
/// The padded sequence keeps a range scan over one subject in append order.
pub const TABLE_LOG_ENTRIES: TableDefinition<&str, &str> = TableDefinition::new("log_entries_v1");

/// Application state shared across all request handlers
///
/// Cloning is cheap: both stores hold the same `Arc<Database>`.
#[derive(Clone)]
pub struct AppState {
    pub links: LinkStore,
    pub logs: LogStore,
}

impl AppState {
    /// Builds the state with the default random token generator
    pub fn new(db: Database) -> Self {
        Self::with_generator(db, Arc::new(RandomTokenGenerator::default()))
    }

    pub fn with_generator(db: Database, generator: Arc<dyn TokenGenerator>) -> Self {
        let db = Arc::new(db);
        Self {
            links: LinkStore::new(Arc::clone(&db), generator),
            logs: LogStore::new(db),
        }
    }

    /// Releases the database once no other clone of the state is alive
    ///
    /// redb flushes and closes the file when the last handle is dropped. Fails
    /// if a clone (e.g. a router that is still serving) holds the database.
    pub fn close(self) -> Result<(), AppError> {
        let AppState { links, logs } = self;
        drop(links);

        match Arc::try_unwrap(logs.into_database()) {
            Ok(db) => {
                drop(db);
                tracing::info!("database closed");
                Ok(())
            }
            Err(_) => Err(AppError::StoreFailure(
                "database is still referenced elsewhere".to_string(),
            )),
        }
    }
}

/// Initializes the embedded database and creates required tables
///
/// # Arguments
///
/// * `db_path` - File path where the database should be stored (e.g., "data.db")
///
/// # Example
///
/// ```no_run
/// # use microservices::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_LINKS)?;
        write_txn.open_table(TABLE_SUBJECTS)?;
        write_txn.open_table(TABLE_LOG_ENTRIES)?;
    }
    write_txn.commit()?;

    Ok(db)
}
