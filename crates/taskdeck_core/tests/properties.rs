use std::collections::HashSet;

use proptest::prelude::*;
use taskdeck_core::{Filter, Item, ItemPatch, ManualClock, TaskStore};

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Update(usize, String),
    ToggleComplete(usize),
    ToggleArchive(usize),
    Delete(usize),
    ClearCompleted,
    ClearArchived,
    Tick(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[ a-z]{0,8}".prop_map(Op::Create),
        1 => (any::<usize>(), "[ a-z]{0,8}").prop_map(|(i, t)| Op::Update(i, t)),
        2 => any::<usize>().prop_map(Op::ToggleComplete),
        2 => any::<usize>().prop_map(Op::ToggleArchive),
        1 => any::<usize>().prop_map(Op::Delete),
        1 => Just(Op::ClearCompleted),
        1 => Just(Op::ClearArchived),
        1 => (-50i64..200).prop_map(Op::Tick),
    ]
}

fn pick(store: &TaskStore<ManualClock>, index: usize) -> Option<uuid::Uuid> {
    let snapshot = store.list();
    if snapshot.is_empty() {
        return None;
    }
    Some(snapshot[index % snapshot.len()].id)
}

fn run(ops: &[Op]) -> TaskStore<ManualClock> {
    let clock = ManualClock::new(1_000);
    let mut store = TaskStore::with_clock(Vec::new(), clock.clone());
    for op in ops {
        match op {
            Op::Create(title) => {
                store.create(title.clone(), None);
            }
            Op::Update(index, title) => {
                if let Some(id) = pick(&store, *index) {
                    store.update(id, ItemPatch::new().title(title.clone()));
                }
            }
            Op::ToggleComplete(index) => {
                if let Some(id) = pick(&store, *index) {
                    store.toggle_complete(id);
                }
            }
            Op::ToggleArchive(index) => {
                if let Some(id) = pick(&store, *index) {
                    store.toggle_archive(id);
                }
            }
            Op::Delete(index) => {
                if let Some(id) = pick(&store, *index) {
                    store.delete(id);
                }
            }
            Op::ClearCompleted => {
                store.clear_completed();
            }
            Op::ClearArchived => {
                store.clear_archived();
            }
            Op::Tick(delta) => clock.advance(*delta),
        }
    }
    store
}

fn ids(items: &[&Item]) -> HashSet<uuid::Uuid> {
    items.iter().map(|item| item.id).collect()
}

proptest! {
    #[test]
    fn ids_stay_unique_and_items_stay_valid(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let store = run(&ops);
        let snapshot = store.list();
        let unique: HashSet<_> = snapshot.iter().map(|item| item.id).collect();
        prop_assert_eq!(unique.len(), snapshot.len());
        for item in snapshot.iter() {
            prop_assert!(item.validate().is_ok());
            prop_assert!(item.updated_at >= item.created_at);
        }
    }

    #[test]
    fn filters_partition_the_collection(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let store = run(&ops);
        let snapshot = store.list();
        let everything: HashSet<_> = snapshot.iter().map(|item| item.id).collect();

        let all = ids(&store.view(Filter::All));
        let archived = ids(&store.view(Filter::Archived));
        let active = ids(&store.view(Filter::Active));
        let completed = ids(&store.view(Filter::Completed));

        prop_assert_eq!(all.union(&archived).copied().collect::<HashSet<_>>(), everything);
        prop_assert!(all.is_disjoint(&archived));
        prop_assert!(active.is_disjoint(&completed));
        prop_assert_eq!(active.union(&completed).copied().collect::<HashSet<_>>(), all);
    }

    #[test]
    fn clear_completed_keeps_every_open_item(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut store = run(&ops);
        let open_before: Vec<Item> = store
            .list()
            .iter()
            .filter(|item| !item.completed)
            .cloned()
            .collect();

        store.clear_completed();

        let after = store.list();
        prop_assert!(after.iter().all(|item| !item.completed));
        prop_assert_eq!(after.to_vec(), open_before);
    }
}
