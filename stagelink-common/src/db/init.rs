//! Database initialization

use crate::config::{is_identifier, ProfileConfig};
use crate::db::schema_sync::{create_table_sql, profile_columns, sync_table};
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::info;

/// Open (creating if needed) the profile database described by `config`
pub async fn init_database(config: &ProfileConfig) -> Result<SqlitePool> {
    let db_path = &config.database_path;
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Pragmas set here apply to every pooled connection.
    // WAL allows concurrent readers with one writer
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_profiles_table(&pool, &config.table).await?;

    Ok(pool)
}

/// Create the profiles table if missing and add any newer columns
pub async fn create_profiles_table(pool: &SqlitePool, table: &str) -> Result<()> {
    if !is_identifier(table) {
        return Err(Error::Config(format!(
            "Table name '{}' must be a plain identifier",
            table
        )));
    }

    let columns = profile_columns();
    sqlx::query(&create_table_sql(table, &columns))
        .execute(pool)
        .await?;

    let added = sync_table(pool, table, &columns).await?;
    if !added.is_empty() {
        info!("Upgraded table '{}': added {}", table, added.join(", "));
    }

    Ok(())
}
