//! Immutable collection snapshots handed to observers.

use crate::model::filter::{self, Filter, FilterCounts};
use crate::model::item::{Item, ItemId};
use std::ops::Deref;
use std::sync::Arc;

/// Point-in-time view of the item collection.
///
/// Cloning is cheap and shares storage. A snapshot is never modified after
/// creation; the store swaps in a new one on every state change, so
/// `ptr_eq` is enough to detect change.
#[derive(Debug, Clone)]
pub struct Snapshot {
    items: Arc<[Item]>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::from(Vec::new())
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Looks up one item by id.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items matching `filter`, in collection order.
    pub fn view(&self, filter: Filter) -> Vec<&Item> {
        filter::apply(&self.items, filter)
    }

    pub fn counts(&self) -> FilterCounts {
        FilterCounts::tally(&self.items)
    }

    /// Returns whether both snapshots share the same storage.
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// Copies the items out for persistence or editing.
    pub fn to_vec(&self) -> Vec<Item> {
        self.items.to_vec()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Item>> for Snapshot {
    fn from(items: Vec<Item>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }
}

impl Deref for Snapshot {
    type Target = [Item];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Snapshot {}
