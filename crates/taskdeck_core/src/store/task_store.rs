//! Task store: the single owner of the item collection.
//!
//! # Responsibility
//! - Apply the fixed mutation set (create/update/toggle/delete/clear).
//! - Publish a fresh [`Snapshot`] to subscribers after every state change.
//! - Wire a [`PersistenceAdapter`] as a subscriber when opened from a slot.
//!
//! # Invariants
//! - Item ids are unique within the collection.
//! - Every state change swaps in a new snapshot; old snapshots stay intact.
//! - No-op calls (unknown id, blank title, nothing to clear) neither swap
//!   the snapshot nor notify subscribers.
//! - Operations never fail; persistence errors stay inside the adapter.

use crate::clock::{Clock, SystemClock};
use crate::model::filter::{Filter, FilterCounts};
use crate::model::item::{is_blank, normalize_description, Item, ItemId};
use crate::persist::PersistenceAdapter;
use crate::slot::SlotStore;
use crate::store::snapshot::Snapshot;
use log::{debug, warn};
use std::collections::HashSet;
use uuid::Uuid;

/// Subscriber callback, invoked synchronously with the new snapshot.
pub type Listener = Box<dyn FnMut(&Snapshot)>;

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Partial edit for [`TaskStore::update`].
///
/// `description: Some(None)` clears the description; `None` leaves it as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets or clears (`None`) the description.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// In-memory task list with subscriber notification.
pub struct TaskStore<C: Clock = SystemClock> {
    state: Snapshot,
    clock: C,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl TaskStore<SystemClock> {
    /// Creates a store over `items` using the system clock.
    pub fn new(items: Vec<Item>) -> Self {
        Self::with_clock(items, SystemClock)
    }

    /// Loads the collection from `adapter` and saves after every change.
    pub fn open<S: SlotStore + 'static>(adapter: PersistenceAdapter<S>) -> Self {
        Self::open_with_clock(adapter, SystemClock)
    }
}

impl<C: Clock> TaskStore<C> {
    /// Creates a store over `items` with a caller-provided clock.
    ///
    /// Items with a duplicate id are dropped (first occurrence wins).
    pub fn with_clock(items: Vec<Item>, clock: C) -> Self {
        Self {
            state: Snapshot::from(dedupe_ids(items)),
            clock,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Loads the collection from `adapter` and subscribes it for saving.
    ///
    /// Load failures yield an empty store. The adapter is not written until
    /// the first state change.
    pub fn open_with_clock<S: SlotStore + 'static>(
        adapter: PersistenceAdapter<S>,
        clock: C,
    ) -> Self {
        let mut store = Self::with_clock(adapter.load(), clock);
        store.subscribe(move |snapshot| {
            adapter.save(snapshot);
        });
        store
    }

    /// Current snapshot.
    pub fn list(&self) -> Snapshot {
        self.state.clone()
    }

    /// Borrowing variant of [`TaskStore::list`].
    pub fn state(&self) -> &Snapshot {
        &self.state
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.state.get(id)
    }

    /// Items matching `filter` in the current snapshot.
    pub fn view(&self, filter: Filter) -> Vec<&Item> {
        self.state.view(filter)
    }

    pub fn counts(&self) -> FilterCounts {
        self.state.counts()
    }

    /// Registers a listener called after every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    /// Appends a new open item.
    ///
    /// Callers are expected to trim input first; a blank title is ignored
    /// and returns `None`.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Option<ItemId> {
        let title = title.into();
        if is_blank(&title) {
            debug!("event=item_create module=store status=skipped reason=blank_title");
            return None;
        }

        let mut id = Uuid::new_v4();
        while self.state.get(id).is_some() {
            id = Uuid::new_v4();
        }

        let item = match Item::with_id(id, title, description, self.clock.now_ms()) {
            Ok(item) => item,
            Err(err) => {
                warn!("event=item_create module=store status=skipped reason=invalid error={err}");
                return None;
            }
        };

        let mut items = self.state.to_vec();
        items.push(item);
        self.commit(items);
        debug!("event=item_create module=store status=ok id={id}");
        Some(id)
    }

    /// Applies `patch` to the item with `id` and touches `updated_at`.
    ///
    /// Unknown ids and blank patch titles are ignored.
    pub fn update(&mut self, id: ItemId, patch: ItemPatch) -> bool {
        if patch.title.as_deref().is_some_and(is_blank) {
            debug!("event=item_update module=store status=skipped reason=blank_title id={id}");
            return false;
        }

        self.mutate_item("item_update", id, move |item| {
            if let Some(title) = patch.title {
                item.title = title;
            }
            if let Some(description) = patch.description {
                item.description = normalize_description(description);
            }
        })
    }

    /// Flips `completed`. Archived items are toggled too.
    pub fn toggle_complete(&mut self, id: ItemId) -> bool {
        self.mutate_item("item_toggle_complete", id, |item| {
            item.completed = !item.completed;
        })
    }

    /// Flips `archived`, keeping `completed` as is.
    pub fn toggle_archive(&mut self, id: ItemId) -> bool {
        self.mutate_item("item_toggle_archive", id, |item| {
            item.archived = !item.archived;
        })
    }

    /// Removes the item with `id`. Idempotent.
    pub fn delete(&mut self, id: ItemId) -> bool {
        let removed = self.remove_where(|item| item.id == id);
        if removed == 0 {
            debug!("event=item_delete module=store status=skipped reason=not_found id={id}");
            return false;
        }
        debug!("event=item_delete module=store status=ok id={id}");
        true
    }

    /// Removes every completed item, archived or not. Returns the count.
    pub fn clear_completed(&mut self) -> usize {
        let removed = self.remove_where(|item| item.completed);
        debug!("event=clear_completed module=store status=ok removed={removed}");
        removed
    }

    /// Removes every archived item, completed or not. Returns the count.
    pub fn clear_archived(&mut self) -> usize {
        let removed = self.remove_where(|item| item.archived);
        debug!("event=clear_archived module=store status=ok removed={removed}");
        removed
    }

    fn mutate_item(&mut self, event: &str, id: ItemId, apply: impl FnOnce(&mut Item)) -> bool {
        let Some(index) = self.state.iter().position(|item| item.id == id) else {
            debug!("event={event} module=store status=skipped reason=not_found id={id}");
            return false;
        };

        let now_ms = self.clock.now_ms();
        let mut items = self.state.to_vec();
        let item = &mut items[index];
        apply(item);
        item.touch(now_ms);

        self.commit(items);
        debug!("event={event} module=store status=ok id={id}");
        true
    }

    fn remove_where(&mut self, predicate: impl Fn(&Item) -> bool) -> usize {
        let removed = self.state.iter().filter(|item| predicate(item)).count();
        if removed == 0 {
            return 0;
        }

        let kept = self
            .state
            .iter()
            .filter(|item| !predicate(item))
            .cloned()
            .collect();
        self.commit(kept);
        removed
    }

    fn commit(&mut self, items: Vec<Item>) {
        self.state = Snapshot::from(items);
        let snapshot = self.state.clone();
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

fn dedupe_ids(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::with_capacity(items.len());
    let total = items.len();
    let unique: Vec<Item> = items.into_iter().filter(|item| seen.insert(item.id)).collect();
    if unique.len() != total {
        warn!(
            "event=store_init module=store status=ok dropped_duplicates={}",
            total - unique.len()
        );
    }
    unique
}
