use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use taskdeck_core::{Filter, ItemPatch, ManualClock, Snapshot, TaskStore};
use uuid::Uuid;

fn store_at(start_ms: i64) -> (TaskStore<ManualClock>, ManualClock) {
    let clock = ManualClock::new(start_ms);
    (TaskStore::with_clock(Vec::new(), clock.clone()), clock)
}

fn titles(items: &[&taskdeck_core::Item]) -> Vec<String> {
    items.iter().map(|item| item.title.clone()).collect()
}

#[test]
fn create_appends_open_item_with_equal_timestamps() {
    let (mut store, _) = store_at(1_000);
    store.create("first", None).unwrap();
    let id = store.create("Walk dog", Some("30 min".to_string())).unwrap();

    let snapshot = store.list();
    assert_eq!(snapshot.len(), 2);
    let created = snapshot.last().unwrap();
    assert_eq!(created.id, id);
    assert_eq!(created.title, "Walk dog");
    assert_eq!(created.description.as_deref(), Some("30 min"));
    assert!(!created.completed);
    assert!(!created.archived);
    assert_eq!(created.created_at, created.updated_at);
}

#[test]
fn create_with_blank_title_is_a_silent_noop() {
    let (mut store, _) = store_at(1);
    let before = store.list();

    assert_eq!(store.create("   ", Some("ignored".to_string())), None);
    assert_eq!(store.create("", None), None);

    assert!(store.list().ptr_eq(&before));
}

#[test]
fn create_normalizes_blank_description_to_none() {
    let (mut store, _) = store_at(1);
    let id = store.create("t", Some("  ".to_string())).unwrap();
    assert_eq!(store.get(id).unwrap().description, None);
}

#[test]
fn update_replaces_provided_fields_and_touches_updated_at() {
    let (mut store, clock) = store_at(100);
    let id = store.create("draft", Some("notes".to_string())).unwrap();

    clock.advance(50);
    assert!(store.update(id, ItemPatch::new().title("final")));
    let item = store.get(id).unwrap();
    assert_eq!(item.title, "final");
    assert_eq!(item.description.as_deref(), Some("notes"));
    assert_eq!(item.created_at, 100);
    assert_eq!(item.updated_at, 150);

    clock.advance(50);
    assert!(store.update(id, ItemPatch::new().description(None)));
    let item = store.get(id).unwrap();
    assert_eq!(item.title, "final");
    assert_eq!(item.description, None);
    assert_eq!(item.updated_at, 200);
}

#[test]
fn update_ignores_unknown_id_and_blank_title() {
    let (mut store, clock) = store_at(100);
    let id = store.create("keep", None).unwrap();
    let before = store.list();

    clock.advance(10);
    assert!(!store.update(Uuid::new_v4(), ItemPatch::new().title("x")));
    assert!(!store.update(id, ItemPatch::new().title(" \n ")));

    assert!(store.list().ptr_eq(&before));
    assert_eq!(store.get(id).unwrap().title, "keep");
    assert_eq!(store.get(id).unwrap().updated_at, 100);
}

#[test]
fn toggle_complete_twice_restores_flag_and_advances_updated_at() {
    let (mut store, clock) = store_at(10);
    let id = store.create("task", None).unwrap();

    clock.advance(5);
    store.toggle_complete(id);
    let first = store.get(id).unwrap().clone();
    assert!(first.completed);

    clock.advance(5);
    store.toggle_complete(id);
    let second = store.get(id).unwrap();
    assert!(!second.completed);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(second.updated_at, 20);
}

#[test]
fn toggles_on_unknown_id_do_nothing() {
    let (mut store, _) = store_at(10);
    store.create("task", None).unwrap();
    let before = store.list();

    assert!(!store.toggle_complete(Uuid::new_v4()));
    assert!(!store.toggle_archive(Uuid::new_v4()));
    assert!(store.list().ptr_eq(&before));
}

#[test]
fn archiving_keeps_completed_and_archived_items_can_still_toggle() {
    let (mut store, _) = store_at(10);
    let id = store.create("task", None).unwrap();

    store.toggle_complete(id);
    store.toggle_archive(id);
    let item = store.get(id).unwrap();
    assert!(item.completed);
    assert!(item.archived);

    store.toggle_complete(id);
    assert!(!store.get(id).unwrap().completed);

    store.toggle_archive(id);
    let item = store.get(id).unwrap();
    assert!(!item.archived);
    assert!(!item.completed);
}

#[test]
fn delete_removes_one_item_in_place_and_is_idempotent() {
    let (mut store, clock) = store_at(10);
    let a = store.create("a", None).unwrap();
    let b = store.create("b", None).unwrap();
    let c = store.create("c", None).unwrap();

    clock.advance(100);
    assert!(store.delete(b));
    let after_first = store.list();
    let ids: Vec<_> = after_first.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![a, c]);
    assert!(after_first.iter().all(|item| item.updated_at == 10));

    assert!(!store.delete(b));
    assert!(store.list().ptr_eq(&after_first));
}

#[test]
fn clear_completed_keeps_open_items_unchanged() {
    let (mut store, _) = store_at(10);
    let a = store.create("a", None).unwrap();
    let b = store.create("b", None).unwrap();
    let c = store.create("c", None).unwrap();
    let d = store.create("d", None).unwrap();
    store.toggle_complete(b);
    store.toggle_complete(d);
    store.toggle_archive(d);
    let open_before: Vec<_> = store
        .list()
        .iter()
        .filter(|item| !item.completed)
        .cloned()
        .collect();

    assert_eq!(store.clear_completed(), 2);

    let after = store.list();
    assert!(after.iter().all(|item| !item.completed));
    assert_eq!(after.to_vec(), open_before);
    let ids: Vec<_> = after.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn clear_archived_removes_archived_regardless_of_completion() {
    let (mut store, _) = store_at(10);
    let a = store.create("a", None).unwrap();
    let b = store.create("b", None).unwrap();
    let c = store.create("c", None).unwrap();
    store.toggle_archive(a);
    store.toggle_complete(c);
    store.toggle_archive(c);

    assert_eq!(store.clear_archived(), 2);
    let ids: Vec<_> = store.list().iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![b]);
}

#[test]
fn clear_with_nothing_to_remove_keeps_snapshot() {
    let (mut store, _) = store_at(10);
    store.create("a", None).unwrap();
    let before = store.list();

    assert_eq!(store.clear_completed(), 0);
    assert_eq!(store.clear_archived(), 0);
    assert!(store.list().ptr_eq(&before));
}

#[test]
fn snapshots_are_never_mutated_after_handout() {
    let (mut store, _) = store_at(10);
    let id = store.create("a", None).unwrap();
    let held = store.list();

    store.toggle_complete(id);
    store.update(id, ItemPatch::new().title("renamed"));
    store.create("b", None).unwrap();

    assert_eq!(held.len(), 1);
    assert_eq!(held[0].title, "a");
    assert!(!held[0].completed);
    assert!(!store.list().ptr_eq(&held));
}

#[test]
fn subscribers_are_notified_once_per_state_change() {
    let (mut store, _) = store_at(10);
    let seen: Rc<RefCell<Vec<Snapshot>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.clone()));

    let id = store.create("a", None).unwrap();
    store.toggle_complete(id);
    store.delete(Uuid::new_v4());
    store.create(" ", None);
    store.clear_archived();
    store.clear_completed();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].len(), 1);
    assert!(seen[1][0].completed);
    assert!(seen[2].is_empty());
    assert!(seen[2].ptr_eq(store.state()));
}

#[test]
fn scenario_filters_after_complete_and_archive() {
    let (mut store, _) = store_at(1_000);
    let milk = store.create("Buy milk", None).unwrap();
    let dog = store.create("Walk dog", Some("30 min".to_string())).unwrap();
    store.toggle_complete(milk);
    store.toggle_archive(dog);

    assert_eq!(titles(&store.view(Filter::All)), vec!["Buy milk"]);
    assert_eq!(titles(&store.view(Filter::Archived)), vec!["Walk dog"]);
    assert!(store.view(Filter::Active).is_empty());
    assert_eq!(titles(&store.view(Filter::Completed)), vec!["Buy milk"]);

    let all = store.view(Filter::All);
    assert!(all[0].completed);
    assert!(!all[0].archived);

    let counts = store.counts();
    assert_eq!(counts.all, 1);
    assert_eq!(counts.active, 0);
    assert_eq!(counts.completed, 1);
    assert_eq!(counts.archived, 1);
}

#[test]
fn ids_are_unique_across_many_creates() {
    let (mut store, _) = store_at(1);
    for index in 0..200 {
        store.create(format!("task {index}"), None).unwrap();
    }
    let ids: HashSet<_> = store.list().iter().map(|item| item.id).collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn backwards_clock_never_breaks_timestamp_order() {
    let (mut store, clock) = store_at(1_000);
    let id = store.create("t", None).unwrap();

    clock.set(10);
    store.toggle_complete(id);
    let item = store.get(id).unwrap();
    assert!(item.updated_at >= item.created_at);
    assert_eq!(item.updated_at, 1_000);
}
