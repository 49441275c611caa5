//! Link Store: persists token -> URL mappings and resolves them

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable};
use std::sync::Arc;

use crate::database::TABLE_LINKS;
use crate::error::AppError;
use crate::generator::TokenGenerator;
use crate::model::LinkMapping;
use crate::validation::validate_web_url;

/// How many tokens `create` tries before giving up on collisions
pub const MAX_TOKEN_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct LinkStore {
    db: Arc<Database>,
    generator: Arc<dyn TokenGenerator>,
}

impl LinkStore {
    pub fn new(db: Arc<Database>, generator: Arc<dyn TokenGenerator>) -> Self {
        Self { db, generator }
    }

    /// Validates `original_url` and stores it under a fresh token
    ///
    /// The existence check and the insert share one write transaction, so a
    /// mapping is never overwritten. Identical URLs get distinct tokens.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the URL is not an absolute http/https URL with a host
    /// - `StoreFailure` if every attempted token was already taken, or on I/O
    pub fn create(&self, original_url: &str) -> Result<LinkMapping, AppError> {
        validate_web_url(original_url)?;

        let write_txn = self.db.begin_write()?;
        let mapping = {
            let mut table = write_txn.open_table(TABLE_LINKS)?;

            let mut issued = None;
            for attempt in 1..=MAX_TOKEN_ATTEMPTS {
                let token = self.generator.generate();
                if table.get(token.as_str())?.is_none() {
                    issued = Some(token);
                    break;
                }
                tracing::debug!(%token, attempt, "token collision, regenerating");
            }
            let token = issued.ok_or_else(|| {
                AppError::StoreFailure(format!(
                    "no unique token after {MAX_TOKEN_ATTEMPTS} attempts"
                ))
            })?;

            let mapping = LinkMapping {
                token,
                original_url: original_url.to_string(),
                created_at: Utc::now(),
            };
            let record_json = serde_json::to_string(&mapping)?;
            table.insert(mapping.token.as_str(), record_json.as_str())?;
            mapping
        };
        write_txn.commit()?;

        tracing::info!(token = %mapping.token, "short link created");
        Ok(mapping)
    }

    /// Looks up the URL stored for `token`, unchanged
    pub fn resolve(&self, token: &str) -> Result<String, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_LINKS)?;

        let record = table.get(token)?.map(|guard| guard.value().to_string());
        match record {
            Some(record_json) => {
                let mapping: LinkMapping = serde_json::from_str(&record_json)?;
                Ok(mapping.original_url)
            }
            None => Err(AppError::NotFound(
                "No URL found for this short URL".to_string(),
            )),
        }
    }
}
