//! Configuration loading
//!
//! Config file resolution priority:
//! 1. Explicit path (e.g. from a command-line argument)
//! 2. `STAGELINK_CONFIG` environment variable
//! 3. `<config dir>/stagelink/config.toml`
//! 4. Compiled defaults
//!
//! A missing file is not an error: a warning is logged and defaults are
//! used. A file that exists but does not parse is an error.

use crate::cache::CacheKey;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "STAGELINK_CONFIG";

/// Profile layer configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Table holding profile rows
    pub table: String,

    /// SQLite busy timeout in milliseconds
    pub busy_timeout_ms: u64,

    pub cache: CacheConfig,

    pub logging: LoggingConfig,
}

/// Cache key layout
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// First segment of single-profile cache keys
    pub profile_key: String,

    /// Key of the profile collection cache; empty disables it
    pub collection_key: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            table: "profiles".to_string(),
            busy_timeout_ms: 5000,
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            profile_key: "profile".to_string(),
            collection_key: "profiles".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl CacheConfig {
    /// Cache key for one profile read
    pub fn key_for_profile(&self, id: &str) -> CacheKey {
        CacheKey::profile(&self.profile_key, id)
    }

    /// Cache key for the collection read, if one is configured
    pub fn key_for_collection(&self) -> Option<CacheKey> {
        if self.collection_key.is_empty() {
            None
        } else {
            Some(CacheKey::collection(&self.collection_key))
        }
    }
}

impl ProfileConfig {
    /// Resolve and load configuration
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_path) {
            Some(path) => Self::load_file(&path),
            None => {
                info!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific file, falling back to defaults if it is missing
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !is_identifier(&self.table) {
            return Err(Error::Config(format!(
                "Table name '{}' must be a plain identifier",
                self.table
            )));
        }
        if self.cache.profile_key.is_empty() {
            return Err(Error::Config("cache.profile_key must not be empty".to_string()));
        }
        Ok(())
    }
}

/// True for `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Find the config file to load, following the priority order above
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: User config directory
    dirs::config_dir()
        .map(|d| d.join("stagelink").join("config.toml"))
        .filter(|p| p.exists())
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("stagelink"))
        .unwrap_or_else(|| PathBuf::from("./stagelink_data"))
        .join("stagelink.db")
}
