//! Local fallback persistence.
//!
//! Submissions the collector rejects are kept in a process-wide key-value
//! store under [`FALLBACK_KEY`], as a JSON array of [`FallbackRecord`]s. The
//! store is an injected capability so the pipeline can run against `SQLite`
//! on disk or an in-memory map in tests.
//!
//! The log is append-only from the submitter's point of view: records are
//! only ever pushed to the end, never rewritten or removed.

pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::FallbackRecord;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key under which fallback records are persisted.
pub const FALLBACK_KEY: &str = "waitlist_submissions";

/// A string key-value store.
///
/// Implementations must make [`KeyValueStore::update`] atomic with respect to
/// other calls on the same store.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Get the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Read-modify-write the value under `key`.
    ///
    /// `apply` receives the current value and returns the replacement. If it
    /// fails, nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or `apply` fails.
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()> {
        let next = apply(self.get(key)?)?;
        self.set(key, &next)
    }
}

/// The ordered log of fallback records.
#[derive(Debug, Clone)]
pub struct FallbackLog {
    store: Arc<dyn KeyValueStore>,
}

impl FallbackLog {
    /// Wrap a store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read every record, oldest first.
    ///
    /// An absent key, or a value that isn't a JSON array, reads as an empty
    /// log. Array entries that aren't records are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backing store itself fails.
    pub fn read(&self) -> Result<Vec<FallbackRecord>> {
        let entries = self
            .store
            .get(FALLBACK_KEY)?
            .map(|raw| parse_entries(&raw))
            .unwrap_or_default();

        Ok(entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "Skipping fallback entry that is not a record");
                    None
                }
            })
            .collect())
    }

    /// Replace the whole log.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn write(&self, records: &[FallbackRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.store.set(FALLBACK_KEY, &raw)
    }

    /// Append one record to the end of the log.
    ///
    /// Existing array entries are kept as stored, including ones [`read`]
    /// skips. Returns the number of entries in the log afterwards.
    ///
    /// [`read`]: FallbackLog::read
    ///
    /// # Errors
    ///
    /// Returns an error if the read-modify-write fails; the log is then left
    /// as it was.
    pub fn append(&self, record: &FallbackRecord) -> Result<usize> {
        let entry = serde_json::to_value(record)?;
        let mut len = 0;
        self.store.update(FALLBACK_KEY, &mut |current| {
            let mut entries = current.as_deref().map(parse_entries).unwrap_or_default();
            entries.push(entry.clone());
            len = entries.len();
            Ok(serde_json::to_string(&entries)?)
        })?;
        debug!(entries = len, "Appended fallback record");
        Ok(len)
    }

    /// Number of records in the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Check if the log has no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn parse_entries(raw: &str) -> Vec<Value> {
    match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Fallback log is not a JSON array, treating as empty");
            Vec::new()
        }
    }
}
