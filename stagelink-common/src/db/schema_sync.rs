//! Profiles table schema and automatic column addition
//!
//! The column list below is the single source of truth for the profiles
//! table. On startup the table is created if missing, then any column
//! present here but missing from an older database is added with
//! `ALTER TABLE ADD COLUMN`. Type drift is reported but never fixed
//! automatically.

use crate::Result;
use sqlx::{Row, SqlitePool};
use tracing::{info, warn};

/// Nested columns stored as JSON text
pub const JSON_COLUMNS: [&str; 3] = ["social_links", "comment_preferences", "theme_colors"];

/// Column definition with SQL constraints
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    /// SQL type (e.g., "TEXT", "INTEGER")
    pub sql_type: String,
    pub primary_key: bool,
    pub not_null: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            primary_key: false,
            not_null: false,
        }
    }

    /// Mark column as PRIMARY KEY
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if self.not_null {
            sql.push_str(" NOT NULL");
        }
        sql
    }
}

/// Expected columns of the profiles table, in creation order
pub fn profile_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("id", "TEXT").primary_key(),
        ColumnDefinition::new("username", "TEXT"),
        ColumnDefinition::new("full_name", "TEXT"),
        ColumnDefinition::new("email", "TEXT"),
        ColumnDefinition::new("bio", "TEXT"),
        ColumnDefinition::new("first_name", "TEXT"),
        ColumnDefinition::new("last_name", "TEXT"),
        ColumnDefinition::new("location", "TEXT"),
        ColumnDefinition::new("website", "TEXT"),
        // JSON text
        ColumnDefinition::new("social_links", "TEXT"),
        ColumnDefinition::new("comment_preferences", "TEXT"),
        ColumnDefinition::new("theme_colors", "TEXT"),
        // ISO-8601 text
        ColumnDefinition::new("created_at", "TEXT"),
        ColumnDefinition::new("updated_at", "TEXT"),
    ]
}

/// `CREATE TABLE IF NOT EXISTS` statement for `table`
///
/// `table` must already be validated as a plain identifier.
pub fn create_table_sql(table: &str, columns: &[ColumnDefinition]) -> String {
    let body = columns
        .iter()
        .map(ColumnDefinition::to_sql)
        .collect::<Vec<_>>()
        .join(",\n    ");
    format!("CREATE TABLE IF NOT EXISTS {} (\n    {}\n)", table, body)
}

/// Actual column from `PRAGMA table_info`
#[derive(Debug, Clone)]
pub struct ActualColumn {
    pub cid: i32,
    pub name: String,
    pub type_name: String,
}

/// Read actual columns, in table order
pub async fn introspect_table(pool: &SqlitePool, table: &str) -> Result<Vec<ActualColumn>> {
    let query = format!("PRAGMA table_info({})", table);
    let rows = sqlx::query(&query).fetch_all(pool).await?;

    let mut columns: Vec<ActualColumn> = rows
        .iter()
        .map(|row| ActualColumn {
            cid: row.get("cid"),
            name: row.get("name"),
            type_name: row.get("type"),
        })
        .collect();
    columns.sort_by_key(|c| c.cid);

    Ok(columns)
}

pub async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
    )
    .bind(table)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Add missing columns to `table`, returning the names added
///
/// Primary key columns are never added after the fact.
pub async fn sync_table(
    pool: &SqlitePool,
    table: &str,
    expected: &[ColumnDefinition],
) -> Result<Vec<String>> {
    if !table_exists(pool, table).await? {
        warn!("Table '{}' does not exist, nothing to sync", table);
        return Ok(Vec::new());
    }

    let actual = introspect_table(pool, table).await?;
    let mut added = Vec::new();

    for column in expected {
        match actual.iter().find(|c| c.name == column.name) {
            Some(existing) => {
                if !existing.type_name.eq_ignore_ascii_case(&column.sql_type) {
                    warn!(
                        "Column {}.{} has type {} (expected {}), leaving as is",
                        table, column.name, existing.type_name, column.sql_type
                    );
                }
            }
            None if column.primary_key => {
                warn!("Table '{}' lacks primary key column '{}'", table, column.name);
            }
            None => {
                let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column.name, column.sql_type);
                sqlx::query(&sql).execute(pool).await?;
                info!("Added column {}.{}", table, column.name);
                added.push(column.name.clone());
            }
        }
    }

    Ok(added)
}
