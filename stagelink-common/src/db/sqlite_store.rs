//! [`ProfileStore`] over a SQLite pool
//!
//! Nested records live in TEXT columns as JSON. Text that does not parse
//! as JSON is handed up as a JSON string, which the normalizers treat as
//! a malformed value and default.

use crate::config::is_identifier;
use crate::db::schema_sync::{profile_columns, JSON_COLUMNS};
use crate::error::StoreError;
use crate::models::RawRecord;
use crate::store::ProfileStore;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool};
use tracing::{debug, warn};

const NOW_ISO8601_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

#[derive(Debug, Clone)]
pub struct SqliteProfileStore {
    pool: SqlitePool,
}

impl SqliteProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn check_table(table: &str) -> Result<(), StoreError> {
    if is_identifier(table) {
        Ok(())
    } else {
        Err(StoreError::InvalidTable(table.to_string()))
    }
}

/// Convert a row into column name to JSON value
fn row_to_record(row: &SqliteRow) -> RawRecord {
    let mut record = RawRecord::new();

    for column in row.columns() {
        let name = column.name();
        let idx = column.ordinal();

        let value = if let Ok(text) = row.try_get::<Option<String>, _>(idx) {
            match text {
                Some(text) if JSON_COLUMNS.contains(&name) => {
                    serde_json::from_str(&text).unwrap_or(Value::String(text))
                }
                Some(text) => Value::String(text),
                None => Value::Null,
            }
        } else if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
            Value::from(n)
        } else if let Ok(Some(f)) = row.try_get::<Option<f64>, _>(idx) {
            Value::from(f)
        } else {
            Value::Null
        };

        record.insert(name.to_string(), value);
    }

    record
}

/// Column value as bound into SQL: JSON strings as-is, anything else as
/// JSON text
fn to_sql_text(value: &Value) -> Result<Option<String>, StoreError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Ok(Some(serde_json::to_string(other)?)),
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn get(&self, table: &str, id: &str) -> Result<Option<RawRecord>, StoreError> {
        check_table(table)?;

        let sql = format!("SELECT * FROM {} WHERE id = ?", table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(row_to_record))
    }

    async fn update(&self, table: &str, id: &str, patch: &RawRecord) -> Result<(), StoreError> {
        check_table(table)?;

        let known = profile_columns();
        let mut assignments = Vec::with_capacity(patch.len() + 1);
        let mut values = Vec::with_capacity(patch.len());

        for (column, value) in patch {
            if column == "id" || !known.iter().any(|c| &c.name == column) {
                return Err(StoreError::Rejected(format!(
                    "column '{}' cannot be updated",
                    column
                )));
            }
            assignments.push(format!("{} = ?", column));
            values.push(to_sql_text(value)?);
        }

        if !patch.contains_key("updated_at") {
            assignments.push(format!("updated_at = {}", NOW_ISO8601_SQL));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?",
            table,
            assignments.join(", ")
        );

        let mut query = sqlx::query(&sql);
        for value in values {
            query = query.bind(value);
        }
        let result = query.bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            warn!("Update matched no row for id {} in '{}'", id, table);
        } else {
            debug!("Updated {} in '{}'", id, table);
        }

        Ok(())
    }

    async fn list(&self, table: &str) -> Result<Vec<RawRecord>, StoreError> {
        check_table(table)?;

        let sql = format!("SELECT * FROM {} ORDER BY id", table);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(row_to_record).collect())
    }
}
