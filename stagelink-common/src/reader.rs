//! Profile reader
//!
//! Fetches raw rows from a [`ProfileStore`] and hands back fully-populated
//! [`ProfileRecord`]s. Callers never see the stored shape.

use crate::error::FetchError;
use crate::models::ProfileRecord;
use crate::store::ProfileStore;
use crate::time::now_iso8601;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read side of the profile layer
#[derive(Clone)]
pub struct ProfileReader {
    store: Arc<dyn ProfileStore>,
    table: String,
}

impl ProfileReader {
    pub fn new(store: Arc<dyn ProfileStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Fetch and normalize one profile
    ///
    /// # Returns
    /// * `Ok(Some(record))` - Profile found, every field defaulted
    /// * `Ok(None)` - Empty `id`, or no profile stored under it
    /// * `Err(FetchError)` - Store failure, not retried
    pub async fn fetch_profile(&self, id: &str) -> Result<Option<ProfileRecord>, FetchError> {
        if id.trim().is_empty() {
            return Ok(None);
        }

        debug!("Fetching profile {} from '{}'", id, self.table);

        let raw = self
            .store
            .get(&self.table, id)
            .await
            .map_err(|source| FetchError {
                id: Some(id.to_string()),
                source,
            })?;

        match raw {
            Some(raw) => Ok(Some(ProfileRecord::from_raw(id, &raw, &now_iso8601()))),
            None => {
                debug!("No profile stored for {}", id);
                Ok(None)
            }
        }
    }

    /// Fetch and normalize every profile in the table
    ///
    /// Rows without a string `id` are skipped.
    pub async fn fetch_profiles(&self) -> Result<Vec<ProfileRecord>, FetchError> {
        let rows = self
            .store
            .list(&self.table)
            .await
            .map_err(|source| FetchError {
                id: None,
                source,
            })?;

        let now = now_iso8601();
        let mut profiles = Vec::with_capacity(rows.len());
        for raw in &rows {
            match raw.get("id").and_then(Value::as_str) {
                Some(id) if !id.is_empty() => profiles.push(ProfileRecord::from_raw(id, raw, &now)),
                _ => warn!("Skipping row without an id in '{}'", self.table),
            }
        }

        debug!("Fetched {} profiles from '{}'", profiles.len(), self.table);
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::RawRecord;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubStore {
        row: Option<Value>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubStore {
        fn with_row(row: Option<Value>) -> Self {
            Self {
                row,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ProfileStore for StubStore {
        async fn get(&self, _table: &str, _id: &str) -> Result<Option<RawRecord>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Rejected("permission denied".to_string()));
            }
            Ok(self.row.as_ref().and_then(|v| v.as_object().cloned()))
        }

        async fn update(&self, _table: &str, _id: &str, _patch: &RawRecord) -> Result<(), StoreError> {
            Ok(())
        }

        async fn list(&self, _table: &str) -> Result<Vec<RawRecord>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Rejected("permission denied".to_string()));
            }
            Ok(self.row.iter().filter_map(|v| v.as_object().cloned()).collect())
        }
    }

    #[tokio::test]
    async fn test_empty_id_skips_store() {
        let store = Arc::new(StubStore::with_row(Some(json!({ "id": "x" }))));
        let reader = ProfileReader::new(store.clone(), "profiles");

        assert!(reader.fetch_profile("").await.unwrap().is_none());
        assert!(reader.fetch_profile("   ").await.unwrap().is_none());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_row_is_absent() {
        let store = Arc::new(StubStore::with_row(None));
        let reader = ProfileReader::new(store.clone(), "profiles");

        assert!(reader.fetch_profile("missing-id").await.unwrap().is_none());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = Arc::new(StubStore {
            row: None,
            fail: true,
            calls: AtomicUsize::new(0),
        });
        let reader = ProfileReader::new(store.clone(), "profiles");

        let err = reader.fetch_profile("id-1").await.unwrap_err();
        assert_eq!(err.id.as_deref(), Some("id-1"));
        assert_eq!(
            err.to_string(),
            "Failed to fetch profile 'id-1': Rejected by store: permission denied"
        );
        assert!(matches!(err.source, StoreError::Rejected(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_list_failure_reports_collection() {
        let store = Arc::new(StubStore {
            row: None,
            fail: true,
            calls: AtomicUsize::new(0),
        });
        let reader = ProfileReader::new(store.clone(), "profiles");

        let err = reader.fetch_profiles().await.unwrap_err();
        assert!(err.id.is_none());
        assert_eq!(
            err.to_string(),
            "Failed to fetch profile collection: Rejected by store: permission denied"
        );
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_profiles_skips_rows_without_id() {
        let store = Arc::new(StubStore::with_row(Some(json!({ "bio": "no id" }))));
        let reader = ProfileReader::new(store, "profiles");

        assert!(reader.fetch_profiles().await.unwrap().is_empty());
    }
}
