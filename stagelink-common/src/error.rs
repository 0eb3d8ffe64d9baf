//! Error types for Stagelink profile operations

use thiserror::Error;

/// Common result type for ambient operations (config, database setup)
pub type Result<T> = std::result::Result<T, Error>;

/// Ambient errors: configuration, IO and database initialization
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A nested JSON column held something other than an object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid shape for '{field}': expected an object, found {found}")]
pub struct InvalidShapeError {
    /// Name of the nested field being normalized
    pub field: &'static str,
    /// JSON kind that was found instead (null, string, array, ...)
    pub found: &'static str,
}

/// Failure reported by a [`crate::ProfileStore`] implementation
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A JSON column could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the request (permission, constraint, unknown column)
    #[error("Rejected by store: {0}")]
    Rejected(String),

    /// Table name is not a plain SQL identifier
    #[error("Invalid table name: {0}")]
    InvalidTable(String),
}

/// Reading a profile from the store failed
#[derive(Error, Debug)]
#[error("Failed to fetch {}: {source}", fetch_target(.id))]
pub struct FetchError {
    /// Identifier that was requested; `None` for a collection read
    pub id: Option<String>,
    #[source]
    pub source: StoreError,
}

fn fetch_target(id: &Option<String>) -> String {
    match id {
        Some(id) => format!("profile '{}'", id),
        None => "profile collection".to_string(),
    }
}

/// Writing a profile update failed
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The partial update carried no identifier; the store was not contacted
    #[error("Profile update is missing an identifier")]
    MissingIdentifier,

    /// The store rejected the update
    #[error("Store rejected update for profile '{id}': {source}")]
    StoreRejected {
        id: String,
        #[source]
        source: StoreError,
    },
}

/// Cache invalidation failed (logged, never escalated)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cache error: {0}")]
pub struct CacheError(pub String);
