//! Local key-value slots holding serialized snapshots.
//!
//! # Responsibility
//! - Define the minimal read/write/remove contract over string values.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - A missing key reads as `Ok(None)`, never as an error.
//! - `write` replaces the previous value for the key in full.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemorySlotStore;
pub use sqlite::{SqliteSlotStore, SLOT_SCHEMA_VERSION};

pub type SlotResult<T> = Result<T, SlotError>;

/// Slot backend failures.
#[derive(Debug)]
pub enum SlotError {
    Sqlite(rusqlite::Error),
    /// Database was stamped by a newer build.
    UnsupportedSchemaVersion { db_version: u32, supported: u32 },
    /// Connection does not carry the slot schema this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Backend refused the operation (quota, read-only, offline).
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                supported,
            } => write!(
                f,
                "slot database schema version {db_version} is newer than supported {supported}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "slot connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::Unavailable(reason) => write!(f, "slot storage unavailable: {reason}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::UninitializedConnection { .. }
            | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Durable string slots addressed by key.
pub trait SlotStore {
    fn read(&self, key: &str) -> SlotResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> SlotResult<()>;
    fn remove(&self, key: &str) -> SlotResult<()>;
}
