//! Test doubles for the store and cache collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use stagelink_common::{CacheError, CacheKey, CacheLayer, ProfileStore, RawRecord, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Store call as seen by [`RecordingStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Get { table: String, id: String },
    Update { table: String, id: String, patch: RawRecord },
    List { table: String },
}

/// In-memory store that records every call
#[derive(Default)]
pub struct RecordingStore {
    rows: Mutex<HashMap<String, RawRecord>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw row; `row` must be a JSON object with an `id`
    pub fn with_row(self, row: Value) -> Self {
        let row = row.as_object().cloned().expect("row must be an object");
        let id = row["id"].as_str().expect("row must have an id").to_string();
        self.rows.lock().unwrap().insert(id, row);
        self
    }

    /// Make every subsequent call fail with `StoreError::Rejected`
    pub fn failing(self, reason: &str) -> Self {
        *self.fail_with.lock().unwrap() = Some(reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn row(&self, id: &str) -> Option<RawRecord> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        match self.fail_with.lock().unwrap().as_ref() {
            Some(reason) => Err(StoreError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProfileStore for RecordingStore {
    async fn get(&self, table: &str, id: &str) -> Result<Option<RawRecord>, StoreError> {
        self.calls.lock().unwrap().push(StoreCall::Get {
            table: table.to_string(),
            id: id.to_string(),
        });
        self.check_failure()?;
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn update(&self, table: &str, id: &str, patch: &RawRecord) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(StoreCall::Update {
            table: table.to_string(),
            id: id.to_string(),
            patch: patch.clone(),
        });
        self.check_failure()?;

        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.get_mut(id) {
            for (key, value) in patch {
                row.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn list(&self, table: &str) -> Result<Vec<RawRecord>, StoreError> {
        self.calls.lock().unwrap().push(StoreCall::List {
            table: table.to_string(),
        });
        self.check_failure()?;

        let mut rows: Vec<RawRecord> = self.rows.lock().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| a["id"].as_str().cmp(&b["id"].as_str()));
        Ok(rows)
    }
}

/// Cache that records invalidated keys, optionally failing every call
#[derive(Default)]
pub struct RecordingCache {
    invalidated: Mutex<Vec<CacheKey>>,
    fail: bool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            invalidated: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn invalidated(&self) -> Vec<CacheKey> {
        self.invalidated.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheLayer for RecordingCache {
    async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.invalidated.lock().unwrap().push(key.clone());
        if self.fail {
            return Err(CacheError("cache unavailable".to_string()));
        }
        Ok(())
    }
}
