//! Integration tests for error handling.
//!
//! Tests that errors are properly returned for invalid operations and that
//! failed operations leave the store unchanged.

mod common;

use common::{TestEnv, date, store_error};
use std::fs;
use taskstore::{
    ErrorKind, Operation, StoreBulkExt, StoreConfig, StoreError, StoreWorker, Task, TaskStore, WorkerConfig,
    WorkerError,
};

// =============================================================================
// Position Errors
// =============================================================================

#[test]
fn test_get_out_of_range() {
    let mut env = TestEnv::new();
    env.add("A", 1);

    let err = env.store.get(1).unwrap_err();
    assert!(matches!(store_error(&err), StoreError::OutOfRange { index: 1, len: 1 }));
}

#[test]
fn test_remove_at_out_of_range_leaves_store_intact() {
    let mut env = TestEnv::new();
    env.add("A", 1);

    let err = env.store.remove_at(5).unwrap_err();
    assert!(matches!(store_error(&err), StoreError::OutOfRange { .. }));
    assert_eq!(env.titles(), vec!["A"]);
    assert_eq!(env.store.undo().unwrap(), Some(Operation::Add));
}

#[test]
fn test_remove_absent_task_is_not_an_error() {
    let mut env = TestEnv::new();
    env.add("A", 1);

    let removed = env.store.remove_task(&Task::new("B", 1, date(2025, 1, 1))).unwrap();
    assert!(!removed);
    assert_eq!(env.store.len(), 1);
}

// =============================================================================
// Range Errors
// =============================================================================

#[test]
fn test_inverted_priority_range_deletes_nothing() {
    let mut env = TestEnv::new();
    env.add("p1", 1);
    env.add("p5", 5);

    let err = env.store.bulk_delete_by_priority_range(9, 5).unwrap_err();

    assert!(matches!(store_error(&err), StoreError::InvalidRange { lo: 9, hi: 5 }));
    assert_eq!(env.store.len(), 2);
}

// =============================================================================
// Validation / Duplicate Errors
// =============================================================================

#[test]
fn test_duplicate_key_rejected() {
    let mut env = TestEnv::new();
    env.add("A", 1);

    let err = env.store.add_task(Task::new("A", 9, date(2030, 1, 1))).unwrap_err();

    assert!(matches!(store_error(&err), StoreError::DuplicateKey(key) if key == "A"));
    assert_eq!(env.store.len(), 1);
    assert_eq!(env.store.find_by_key("A").unwrap().priority, 1);
}

#[test]
fn test_invalid_tasks_rejected() {
    let mut env = TestEnv::new();
    let due = date(2025, 1, 1);

    for task in [Task::new("", 1, due), Task::new("Zero", 0, due), Task::new("bad\u{7}bell", 1, due)] {
        let err = env.store.add_task(task).unwrap_err();
        assert!(matches!(store_error(&err), StoreError::Validation(_)));
    }

    assert!(env.store.is_empty());
    assert!(!env.store.can_undo());
}

#[test]
fn test_zero_cache_capacity_rejected() {
    let result = TaskStore::new(StoreConfig::new().cache_capacity(0));

    let err = result.err().expect("zero capacity should fail");
    assert!(matches!(store_error(&err), StoreError::InvalidConfig(_)));
}

// =============================================================================
// Persistence Errors
// =============================================================================

#[test]
fn test_load_missing_file_is_io() {
    let mut env = TestEnv::new();

    let err = env.store.load_from_file(&env.path("nope.dat")).unwrap_err();
    assert!(matches!(store_error(&err), StoreError::Io { .. }));
}

#[test]
fn test_load_garbage_is_format() {
    let mut env = TestEnv::new();
    let path = env.path("tasks.dat");
    fs::write(&path, "title,priority\nnot json").unwrap();

    let err = env.store.load_from_file(&path).unwrap_err();
    assert!(matches!(store_error(&err), StoreError::Format { .. }));
}

#[test]
fn test_failed_load_preserves_state() {
    let mut env = TestEnv::new();
    env.add("Keep me", 1);
    env.add("Me too", 2);
    let path = env.path("broken.dat");
    fs::write(&path, r#"{"version": 1, "tasks": [{"title": "x"#).unwrap();

    assert!(env.store.load_from_file(&path).is_err());

    assert_eq!(env.titles(), vec!["Keep me", "Me too"]);
    assert!(env.store.can_undo());
    env.assert_index_consistent(&[]);
}

#[test]
fn test_save_into_missing_directory_is_io() {
    let mut env = TestEnv::new();
    env.add("A", 1);

    let err = env.store.save_to_file(&env.path("no/such/dir/tasks.dat")).unwrap_err();
    assert!(matches!(store_error(&err), StoreError::Io { .. }));
}

// =============================================================================
// Worker Errors
// =============================================================================

#[tokio::test]
async fn test_worker_reports_error_kinds() {
    let store = TaskStore::new(StoreConfig::default()).unwrap();
    let (handle, join) = StoreWorker::spawn(store, WorkerConfig::default());

    handle.add(Task::new("A", 1, date(2025, 1, 1))).await.unwrap();
    let err = handle.add(Task::new("A", 2, date(2025, 1, 1))).await.unwrap_err();
    assert_eq!(err.downcast_ref::<WorkerError>().unwrap().kind, ErrorKind::DuplicateKey);

    let err = handle.bulk_delete_by_priority(3, 1).await.unwrap_err();
    assert_eq!(err.downcast_ref::<WorkerError>().unwrap().kind, ErrorKind::InvalidRange);

    // the worker keeps serving after errors
    assert_eq!(handle.list().await.unwrap().len(), 1);

    handle.shutdown().await.unwrap();
    let store = join.await.unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn test_bulk_delete_by_name_empty_text_matches_every_title() {
    let mut env = TestEnv::new();
    env.add("A", 1);
    env.add("B", 2);

    assert_eq!(env.store.search_by_title("").len(), 2);
    assert_eq!(env.store.bulk_delete_by_name_substring("").unwrap(), 2);
    assert!(env.store.is_empty());
    env.assert_index_consistent(&["A", "B"]);
}
