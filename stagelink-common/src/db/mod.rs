//! SQLite persistence for profiles

pub mod init;
pub mod schema_sync;
pub mod sqlite_store;

pub use init::*;
pub use schema_sync::*;
pub use sqlite_store::SqliteProfileStore;
