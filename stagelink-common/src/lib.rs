//! # Stagelink Common Library
//!
//! Profile shape reconciliation for the Stagelink musicians' network:
//! - Profile records and partial updates
//! - Normalizers for the nested JSON columns (social links, comment
//!   preferences, theme colors)
//! - Profile reader and writer over injected store and cache collaborators
//! - SQLite-backed store and in-process query cache
//! - Configuration loading and logging setup

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod reader;
pub mod store;
pub mod time;
pub mod writer;

pub use cache::{CacheKey, CacheLayer, QueryCache};
pub use error::{
    CacheError, Error, FetchError, InvalidShapeError, Result, StoreError, UpdateError,
};
pub use models::{
    CommentPreferencesRecord, PartialProfileUpdate, ProfileRecord, RawRecord,
    SocialLinksRecord, ThemeColorsRecord,
};
pub use normalize::{normalize_or_default, NormalizedField};
pub use reader::ProfileReader;
pub use store::ProfileStore;
pub use writer::ProfileWriter;
