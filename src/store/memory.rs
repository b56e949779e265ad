//! In-process store used by tests and local runs without DynamoDB.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LeaderboardStore, RECORD_KEY_ATTRIBUTE, RecordStore};
use crate::core::models::{FieldValue, LeaderboardEntry, StoredRecord};
use crate::errors::LeaderboardError;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<Vec<LeaderboardEntry>>,
    records: Mutex<HashMap<String, StoredRecord>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry directly, bypassing the submission handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry lock is poisoned.
    pub fn insert_entry(&self, entry: LeaderboardEntry) -> Result<(), LeaderboardError> {
        self.entries.lock().map_err(poisoned)?.push(entry);
        Ok(())
    }

    /// Store a record under `key`, adding the key attribute like the real table.
    ///
    /// # Errors
    ///
    /// Returns an error if the record lock is poisoned.
    pub fn insert_record(&self, key: &str, record: StoredRecord) -> Result<(), LeaderboardError> {
        let record = record.with_field(RECORD_KEY_ATTRIBUTE, FieldValue::String(key.to_string()));
        self.records
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), record);
        Ok(())
    }
}

#[async_trait]
impl LeaderboardStore for InMemoryStore {
    async fn put_entry(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        self.insert_entry(entry.clone())
    }

    async fn query_ordered(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut entries = self.entries.lock().map_err(poisoned)?.clone();
        // Index order is by score only; ties keep insertion order
        entries.sort_by(|a, b| a.score.cmp(&b.score));
        Ok(entries)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get_record(&self, key: &str) -> Result<Option<StoredRecord>, LeaderboardError> {
        Ok(self.records.lock().map_err(poisoned)?.get(key).cloned())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> LeaderboardError {
    LeaderboardError::Store("in-memory store lock poisoned".to_string())
}
