//! Shared test infrastructure for taskstore integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::path::PathBuf;
use taskstore::{StoreConfig, StoreError, Task, TaskStore};
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: TaskStore,
}

impl TestEnv {
    /// Create a new test environment with an empty default store.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a new test environment with a custom store config.
    pub fn with_config(config: StoreConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = TaskStore::new(config).expect("Failed to create store");
        Self { temp_dir, store }
    }

    /// Path of a file inside the temp dir.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Add a task due on 01/01/2025.
    pub fn add(&mut self, title: &str, priority: u32) -> Task {
        self.add_due(title, priority, date(2025, 1, 1))
    }

    /// Add a task with a specific due date.
    pub fn add_due(&mut self, title: &str, priority: u32, due: NaiveDate) -> Task {
        let task = Task::new(title, priority, due);
        self.store.add_task(task.clone()).expect("Failed to add task");
        task
    }

    /// Titles in store order.
    pub fn titles(&self) -> Vec<String> {
        self.store.iter().map(|t| t.title.clone()).collect()
    }

    /// Priorities in store order.
    pub fn priorities(&self) -> Vec<u32> {
        self.store.iter().map(|t| t.priority).collect()
    }

    /// Assert every stored task is reachable by key and nothing else is.
    pub fn assert_index_consistent(&mut self, absent: &[&str]) {
        for task in self.store.tasks() {
            assert_eq!(
                self.store.find_by_key(&task.title).as_ref(),
                Some(&task),
                "Expected {:?} to be findable by key",
                task.title
            );
        }
        for key in absent {
            assert!(
                self.store.find_by_key(key).is_none(),
                "Expected {:?} to be absent from the index",
                key
            );
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Invalid date")
}

/// The typed store error carried by a report, if any.
pub fn store_error(report: &eyre::Report) -> &StoreError {
    report
        .downcast_ref::<StoreError>()
        .unwrap_or_else(|| panic!("Expected a StoreError, got: {:#}", report))
}
