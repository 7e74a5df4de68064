//! Integration tests for the todo store.
//!
//! These exercise the mutation operations, the uninitialized-collection
//! guards, aggregates, preference persistence, and reload behavior against
//! the in-memory and SQLite storage backends.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tododeck::storage::{MemoryStorage, SqliteStorage, Storage, keys};
use tododeck::store::TodoStore;
use tododeck::store::views::{SortKey, SortOrder, SortSpec};
use tododeck::store::watch::ChangeKind;
use tododeck::types::{Status, TodoCreateInput, TodoUpdateInput};

fn memory_storage() -> Arc<dyn Storage> {
    Arc::new(MemoryStorage::new())
}

/// Fresh store over in-memory storage, already initialized.
fn setup_store() -> TodoStore {
    let mut store = TodoStore::open(memory_storage()).expect("failed to open store");
    store.initialize().expect("failed to initialize");
    store
}

fn create_input(title: &str) -> TodoCreateInput {
    TodoCreateInput {
        title: title.to_string(),
        description: String::new(),
        status: Status::NotStarted,
        done: false,
        user_id: "user1".to_string(),
        name: "User 1".to_string(),
        assignee_id: None,
        priority: None,
        due_date: None,
    }
}

mod add_tests {
    use super::*;

    #[test]
    fn add_assigns_fresh_id_and_stamps_both_timestamps() {
        let mut store = setup_store();

        let first = store.add(create_input("First")).unwrap().unwrap();
        let second = store.add(create_input("Second")).unwrap().unwrap();

        assert_eq!(first.created_at, first.updated_at);
        assert_ne!(first.id, second.id);
        assert_eq!(store.todos().unwrap().len(), 2);
        // Appended at the end, insertion order preserved.
        assert_eq!(store.todos().unwrap()[1].title, "Second");
    }

    #[test]
    fn add_on_uninitialized_collection_is_a_noop() {
        let mut store = TodoStore::open(memory_storage()).unwrap();
        assert!(!store.is_initialized());

        let created = store.add(create_input("Ghost")).unwrap();

        assert!(created.is_none());
        assert!(store.todos().is_none());
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut store = setup_store();
        store.add(create_input("Keep me")).unwrap();

        assert!(!store.initialize().unwrap());
        assert_eq!(store.todos().unwrap().len(), 1);
    }
}

mod update_tests {
    use super::*;

    #[test]
    fn update_changes_only_the_listed_fields() {
        let mut store = setup_store();
        let target = store.add(create_input("Before")).unwrap().unwrap();
        let other = store.add(create_input("Other")).unwrap().unwrap();

        let matched = store
            .update(
                &target.id,
                TodoUpdateInput {
                    title: Some("After".to_string()),
                    status: Some(Status::InProgress),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(matched);

        let updated = store.get(&target.id).unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(updated.status, Status::InProgress);
        // Immutable fields survive.
        assert_eq!(updated.id, target.id);
        assert_eq!(updated.user_id, target.user_id);
        assert_eq!(updated.created_at, target.created_at);
        assert!(updated.updated_at >= target.updated_at);
        // The untouched record is identical.
        assert_eq!(store.get(&other.id).unwrap(), &other);
    }

    #[test]
    fn update_with_unknown_id_leaves_collection_unchanged() {
        let mut store = setup_store();
        store.add(create_input("Only")).unwrap();
        let before = store.todos().unwrap().to_vec();

        let matched = store
            .update(
                "no-such-id",
                TodoUpdateInput {
                    title: Some("Nope".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(!matched);
        assert_eq!(store.todos().unwrap(), before.as_slice());
    }

    #[test]
    fn update_on_uninitialized_collection_is_a_noop() {
        let mut store = TodoStore::open(memory_storage()).unwrap();

        let matched = store
            .update(
                "any",
                TodoUpdateInput {
                    title: Some("Nope".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(!matched);
        assert!(store.todos().is_none());
    }

    #[test]
    fn identical_update_applied_twice_is_idempotent() {
        let mut store = setup_store();
        let todo = store.add(create_input("Once")).unwrap().unwrap();
        let input = TodoUpdateInput {
            title: Some("Twice".to_string()),
            done: Some(true),
            ..Default::default()
        };

        store.update(&todo.id, input.clone()).unwrap();
        let after_first = store.get(&todo.id).unwrap().clone();
        store.update(&todo.id, input).unwrap();
        let after_second = store.get(&todo.id).unwrap().clone();

        assert!(after_second.updated_at >= after_first.updated_at);
        assert_eq!(
            (after_first.title, after_first.done, after_first.status),
            (
                after_second.title.clone(),
                after_second.done,
                after_second.status
            )
        );
    }

    #[test]
    fn update_can_clear_optional_fields() {
        let mut store = setup_store();
        let mut input = create_input("Assigned");
        input.assignee_id = Some("user2".to_string());
        input.due_date = Some("2024-03-01".parse().unwrap());
        let todo = store.add(input).unwrap().unwrap();

        store
            .update(
                &todo.id,
                TodoUpdateInput {
                    assignee_id: Some(None),
                    due_date: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        let updated = store.get(&todo.id).unwrap();
        assert!(updated.assignee_id.is_none());
        assert!(updated.due_date.is_none());
    }
}

mod toggle_tests {
    use super::*;

    #[test]
    fn toggle_flips_the_done_flag_and_restamps() {
        let mut store = setup_store();
        let todo = store.add(create_input("Flip me")).unwrap().unwrap();

        assert!(store.toggle_done(&todo.id).unwrap());
        assert!(store.get(&todo.id).unwrap().done);

        assert!(store.toggle_done(&todo.id).unwrap());
        let back = store.get(&todo.id).unwrap();
        assert!(!back.done);
        assert!(back.updated_at >= todo.updated_at);
    }

    #[test]
    fn toggle_with_unknown_id_is_a_noop() {
        let mut store = setup_store();
        store.add(create_input("Only")).unwrap();

        assert!(!store.toggle_done("no-such-id").unwrap());
    }
}

mod bulk_tests {
    use super::*;

    #[test]
    fn clear_completed_removes_exactly_the_done_records() {
        let mut store = setup_store();
        let keep_a = store.add(create_input("Keep A")).unwrap().unwrap();
        let drop_b = store.add(create_input("Drop B")).unwrap().unwrap();
        let keep_c = store.add(create_input("Keep C")).unwrap().unwrap();
        store.toggle_done(&drop_b.id).unwrap();

        let removed = store.clear_completed().unwrap();

        assert_eq!(removed, 1);
        let remaining: Vec<&str> = store
            .todos()
            .unwrap()
            .iter()
            .map(|todo| todo.id.as_str())
            .collect();
        assert_eq!(remaining, [keep_a.id.as_str(), keep_c.id.as_str()]);
        // Survivors are untouched, content and order alike.
        assert_eq!(store.get(&keep_a.id).unwrap(), &keep_a);
        assert_eq!(store.get(&keep_c.id).unwrap(), &keep_c);
    }

    #[test]
    fn toggle_all_sets_every_record_and_restamps() {
        let mut store = setup_store();
        let a = store.add(create_input("A")).unwrap().unwrap();
        let b = store.add(create_input("B")).unwrap().unwrap();

        store.set_all_done(true).unwrap();

        for todo in store.todos().unwrap() {
            assert!(todo.done);
            assert!(todo.updated_at >= a.updated_at.max(b.updated_at));
        }
        assert_eq!(store.incomplete_count(), 0);

        store.set_all_done(false).unwrap();
        assert_eq!(store.incomplete_count(), 2);
    }

    #[test]
    fn bulk_operations_on_uninitialized_collection_are_noops() {
        let mut store = TodoStore::open(memory_storage()).unwrap();

        assert_eq!(store.clear_completed().unwrap(), 0);
        store.set_all_done(true).unwrap();
        assert!(store.todos().is_none());
    }
}

mod aggregate_tests {
    use super::*;

    #[test]
    fn aggregates_reduce_over_the_raw_collection() {
        let mut store = setup_store();
        let a = store.add(create_input("A")).unwrap().unwrap();
        store.add(create_input("B")).unwrap();
        store.toggle_done(&a.id).unwrap();

        // A restrictive status filter must not affect the counters.
        store.set_status_filter(vec![Status::Pending]).unwrap();

        assert_eq!(store.incomplete_count(), 1);
        assert!(store.has_completed());
    }

    #[test]
    fn aggregates_on_uninitialized_collection_are_empty() {
        let store = TodoStore::open(memory_storage()).unwrap();
        assert_eq!(store.incomplete_count(), 0);
        assert!(!store.has_completed());
    }
}

mod prefs_tests {
    use super::*;

    #[test]
    fn absent_keys_yield_documented_defaults() {
        let store = TodoStore::open(memory_storage()).unwrap();
        let prefs = store.prefs();

        assert_eq!(prefs.sort, SortSpec::default());
        assert!(prefs.statuses.is_empty());
        assert!(prefs.assignee_id.is_empty());
        assert!(prefs.start_date.is_none());
        assert!(prefs.end_date.is_none());
    }

    #[test]
    fn preferences_persist_per_key_and_reload() {
        let storage = memory_storage();
        {
            let mut store = TodoStore::open(Arc::clone(&storage)).unwrap();
            store
                .set_sort(SortSpec {
                    key: Some(SortKey::Title),
                    order: SortOrder::Desc,
                })
                .unwrap();
            store
                .set_status_filter(vec![Status::NotStarted, Status::Done])
                .unwrap();
            store.set_assignee_filter("user2".to_string()).unwrap();
            store
                .set_date_filter(Some("2024-03-01".parse().unwrap()), None)
                .unwrap();
        }

        let reloaded = TodoStore::open(storage).unwrap();
        let prefs = reloaded.prefs();
        assert_eq!(prefs.sort.key, Some(SortKey::Title));
        assert_eq!(prefs.sort.order, SortOrder::Desc);
        assert_eq!(prefs.statuses, vec![Status::NotStarted, Status::Done]);
        assert_eq!(prefs.assignee_id, "user2");
        assert_eq!(prefs.start_date, Some("2024-03-01".parse().unwrap()));
        assert!(prefs.end_date.is_none());
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn reload_restores_the_identical_collection() {
        let storage = memory_storage();
        let expected = {
            let mut store = TodoStore::open(Arc::clone(&storage)).unwrap();
            store.initialize().unwrap();
            store.add(create_input("Persisted")).unwrap();
            store.todos().unwrap().to_vec()
        };

        let reloaded = TodoStore::open(storage).unwrap();
        assert_eq!(reloaded.todos().unwrap(), expected.as_slice());
    }

    #[test]
    fn sqlite_backend_round_trips_the_collection() {
        let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let expected = {
            let mut store = TodoStore::open(Arc::clone(&storage)).unwrap();
            store.initialize().unwrap();
            let mut input = create_input("Durable");
            input.priority = Some(tododeck::types::Priority::High);
            input.due_date = Some("2024-06-30".parse().unwrap());
            store.add(input).unwrap();
            store.todos().unwrap().to_vec()
        };

        let reloaded = TodoStore::open(storage).unwrap();
        assert_eq!(reloaded.todos().unwrap(), expected.as_slice());
    }

    #[test]
    fn stored_json_uses_the_legacy_wire_shape() {
        let storage = memory_storage();
        let mut store = TodoStore::open(Arc::clone(&storage)).unwrap();
        store.initialize().unwrap();
        store.add(create_input("Wire")).unwrap();

        let raw = storage.read(keys::TODOS).unwrap().unwrap();
        assert!(raw.contains("\"deleted\":false"));
        assert!(raw.contains("\"userId\":\"user1\""));
        assert!(raw.contains("\"status\":\"not-started\""));
    }
}

mod watcher_tests {
    use super::*;

    #[test]
    fn mutations_notify_watchers_with_the_change_kind() {
        let mut store = setup_store();
        let todo_changes = Arc::new(AtomicUsize::new(0));
        let pref_changes = Arc::new(AtomicUsize::new(0));

        let todo_count = Arc::clone(&todo_changes);
        let pref_count = Arc::clone(&pref_changes);
        store.watch(move |kind| match kind {
            ChangeKind::Todos => {
                todo_count.fetch_add(1, Ordering::SeqCst);
            }
            ChangeKind::Prefs => {
                pref_count.fetch_add(1, Ordering::SeqCst);
            }
        });

        let todo = store.add(create_input("Watched")).unwrap().unwrap();
        store.toggle_done(&todo.id).unwrap();
        store.set_assignee_filter("user2".to_string()).unwrap();

        assert_eq!(todo_changes.load(Ordering::SeqCst), 2);
        assert_eq!(pref_changes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unwatched_watcher_stops_receiving() {
        let mut store = setup_store();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        let token = store.watch(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.add(create_input("One")).unwrap();
        assert!(store.unwatch(token));
        store.add(create_input("Two")).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
