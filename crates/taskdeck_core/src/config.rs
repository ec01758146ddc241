//! Runtime configuration for hosts embedding the store.
//!
//! # Responsibility
//! - Hold the database path, slot key and logging settings.
//! - Validate host-supplied values before any storage is touched.
//!
//! Hosts own the flag and environment layer; this module only defines the
//! defaults and the normalization rules.

use crate::logging::LogConfig;
use crate::persist::DEFAULT_SLOT_KEY;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Default SQLite file name, relative to the working directory.
pub const DEFAULT_DB_FILE_NAME: &str = "taskdeck.sqlite3";

const SLOT_KEY_MAX_CHARS: usize = 128;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidSlotKey(String),
    EmptyDbPath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlotKey(key) => write!(
                f,
                "invalid slot key `{key}`; expected 1..={SLOT_KEY_MAX_CHARS} chars without whitespace"
            ),
            Self::EmptyDbPath => write!(f, "database path cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskdeckConfig {
    pub db_path: PathBuf,
    pub slot_key: String,
    pub log: LogConfig,
}

impl Default for TaskdeckConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log: LogConfig::default(),
        }
    }
}

/// Trims and validates a database path.
pub fn normalize_db_path(value: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyDbPath);
    }
    Ok(PathBuf::from(trimmed))
}

/// Trims and validates a slot key.
pub fn normalize_slot_key(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    let valid = !trimmed.is_empty()
        && trimmed.chars().count() <= SLOT_KEY_MAX_CHARS
        && !trimmed
            .chars()
            .any(|ch| ch.is_whitespace() || ch.is_control());
    if !valid {
        return Err(ConfigError::InvalidSlotKey(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}
