//! Persistence seams for the handlers.
//!
//! Handlers only see these traits. Deployed binaries inject the DynamoDB
//! implementations; tests and local runs use [`memory::InMemoryStore`].

pub mod dynamodb;
pub mod memory;

use async_trait::async_trait;

use crate::core::models::{LeaderboardEntry, StoredRecord};
use crate::errors::LeaderboardError;

/// Hash key attribute of the record table.
pub const RECORD_KEY_ATTRIBUTE: &str = "parameters";

#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Persist one new entry. Never overwrites an existing one.
    async fn put_entry(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError>;

    /// All entries sharing the ordered partition, in index (score) order.
    async fn query_ordered(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point read by key. `Ok(None)` when no record exists.
    async fn get_record(&self, key: &str) -> Result<Option<StoredRecord>, LeaderboardError>;
}

pub use dynamodb::{DynamoLeaderboardStore, DynamoRecordStore};
pub use memory::InMemoryStore;
