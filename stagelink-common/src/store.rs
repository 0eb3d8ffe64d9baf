//! Persistent store abstraction
//!
//! The reader and writer never talk to a database directly; they go through
//! a [`ProfileStore`] handed to them at construction. Production code uses
//! [`crate::db::SqliteProfileStore`], tests substitute fakes.

use crate::error::StoreError;
use crate::models::RawRecord;
use async_trait::async_trait;

/// Single-table record store keyed by primary key
///
/// Implementations assume at most one record per identifier per table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up one record by primary key
    ///
    /// # Returns
    /// * `Ok(Some(_))` - Record found
    /// * `Ok(None)` - No record with that identifier
    /// * `Err(_)` - The store could not answer
    async fn get(&self, table: &str, id: &str) -> Result<Option<RawRecord>, StoreError>;

    /// Apply `patch` (column name to value) to the record with `id`
    async fn update(&self, table: &str, id: &str, patch: &RawRecord) -> Result<(), StoreError>;

    /// Every record in the table
    async fn list(&self, table: &str) -> Result<Vec<RawRecord>, StoreError>;
}
