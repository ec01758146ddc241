//! Core logic for taskdeck, a local task list.
//! This crate owns the item collection, its views and its persistence.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod persist;
pub mod slot;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, TaskdeckConfig};
pub use logging::{
    default_log_level, init_logging, logging_status, LogConfig, LogLevel, LogTarget, LoggingError,
};
pub use model::filter::{Filter, FilterCounts, FilterParseError};
pub use model::item::{Item, ItemId, ItemValidationError};
pub use persist::{PersistError, PersistResult, PersistenceAdapter, DEFAULT_SLOT_KEY};
pub use slot::{
    MemorySlotStore, SlotError, SlotResult, SlotStore, SqliteSlotStore, SLOT_SCHEMA_VERSION,
};
pub use store::snapshot::Snapshot;
pub use store::task_store::{ItemPatch, Listener, SubscriptionId, TaskStore};

