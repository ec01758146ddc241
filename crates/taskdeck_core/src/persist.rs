//! Persistence adapter between the store and one slot.
//!
//! # Responsibility
//! - Serialize the full collection into a single slot value and back.
//! - Offer best-effort `load`/`save` that log failures instead of
//!   returning them.
//!
//! # Invariants
//! - An absent slot loads as an empty collection.
//! - Malformed or inconsistent slot data never reaches the store.
//! - Save failures never propagate to store callers.

use crate::model::item::{Item, ItemId};
use crate::slot::{SlotError, SlotStore};
use log::{debug, error, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default slot key holding the item collection.
pub const DEFAULT_SLOT_KEY: &str = "taskdeck.items";

pub type PersistResult<T> = Result<T, PersistError>;

/// Persistence adapter errors.
#[derive(Debug)]
pub enum PersistError {
    Slot(SlotError),
    /// Stored value is not a valid item array.
    Malformed(serde_json::Error),
    /// Stored value contains the same id twice.
    DuplicateId(ItemId),
    Encode(serde_json::Error),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Slot(err) => write!(f, "{err}"),
            Self::Malformed(err) => write!(f, "malformed slot data: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate item id in slot data: {id}"),
            Self::Encode(err) => write!(f, "failed to encode items: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Slot(err) => Some(err),
            Self::Malformed(err) | Self::Encode(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<SlotError> for PersistError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

/// Reads and writes the item collection under one slot key.
pub struct PersistenceAdapter<S: SlotStore> {
    slot: S,
    key: String,
}

impl<S: SlotStore> PersistenceAdapter<S> {
    /// Adapter over [`DEFAULT_SLOT_KEY`].
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, DEFAULT_SLOT_KEY)
    }

    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads and validates the stored collection.
    ///
    /// # Errors
    /// - `Slot` when the backend read fails.
    /// - `Malformed` when the value is not a valid item array.
    /// - `DuplicateId` when two records share an id.
    pub fn try_load(&self) -> PersistResult<Vec<Item>> {
        let Some(raw) = self.slot.read(&self.key)? else {
            return Ok(Vec::new());
        };

        let items: Vec<Item> = serde_json::from_str(&raw).map_err(PersistError::Malformed)?;
        let mut seen = HashSet::with_capacity(items.len());
        if let Some(duplicate) = items.iter().find(|item| !seen.insert(item.id)) {
            return Err(PersistError::DuplicateId(duplicate.id));
        }
        Ok(items)
    }

    /// Best-effort load: any failure is logged and yields an empty list.
    pub fn load(&self) -> Vec<Item> {
        match self.try_load() {
            Ok(items) => {
                debug!(
                    "event=slot_load module=persist status=ok key={} items={}",
                    self.key,
                    items.len()
                );
                items
            }
            Err(err) => {
                warn!(
                    "event=slot_load module=persist status=error key={} fallback=empty error={err}",
                    self.key
                );
                Vec::new()
            }
        }
    }

    /// Serializes `items` and overwrites the slot.
    pub fn try_save(&self, items: &[Item]) -> PersistResult<()> {
        let encoded = serde_json::to_string(items).map_err(PersistError::Encode)?;
        self.slot.write(&self.key, &encoded)?;
        Ok(())
    }

    /// Best-effort save. Returns whether the write succeeded.
    pub fn save(&self, items: &[Item]) -> bool {
        match self.try_save(items) {
            Ok(()) => {
                debug!(
                    "event=slot_save module=persist status=ok key={} items={}",
                    self.key,
                    items.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=slot_save module=persist status=error key={} items={} error={err}",
                    self.key,
                    items.len()
                );
                false
            }
        }
    }

    /// Removes the stored collection entirely.
    pub fn clear(&self) -> PersistResult<()> {
        self.slot.remove(&self.key)?;
        Ok(())
    }
}
