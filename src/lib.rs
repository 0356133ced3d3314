//! Taskstore: an in-memory task store engine.
//!
//! The store keeps tasks in a singly-linked sequence, mirrors them in a
//! fixed-bucket hash index with an LRU cache in front, records adds and
//! removes for undo/redo, and persists snapshots to a single file.
//!
//! # Example
//!
//! ```no_run
//! use taskstore::{StoreBulkExt, StoreConfig, Task, TaskStore};
//! use chrono::NaiveDate;
//! use std::path::Path;
//!
//! let mut store = TaskStore::new(StoreConfig::default()).unwrap();
//! let due = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//!
//! store.add_task(Task::new("Write report", 2, due)).unwrap();
//! store.add_task(Task::new("Book flights", 1, due)).unwrap();
//!
//! store.sort_by_priority();
//! assert_eq!(store.get(0).unwrap().title, "Book flights");
//!
//! store.undo().unwrap();
//! assert!(store.find_by_key("Book flights").is_none());
//!
//! store.bulk_delete_by_priority_range(1, 3).unwrap();
//! store.save_to_file(Path::new("tasks.dat")).unwrap();
//! ```

mod cache;
mod history;
mod index;
mod list;
mod sort;
mod storage;
mod store;
mod tree;
mod types;

pub mod builder;
pub mod bulk;
pub mod protocol;
pub mod worker;

// Re-export public API
pub use builder::{StoreBuilderExt, TaskBuilder};
pub use bulk::{StoreBulkExt, collect_members};
pub use cache::{BoundedCache, DEFAULT_CACHE_CAPACITY};
pub use history::{History, HistoryEntry};
pub use index::{DEFAULT_BUCKETS, KeyIndex};
pub use list::SeqList;
pub use protocol::{ErrorKind, Request, Response, WorkerError};
pub use sort::{merge_sort, quick_sort};
pub use storage::{DEFAULT_DATA_FILE, read_snapshot, write_snapshot};
pub use store::{StoreConfig, StoreError, TaskStore};
pub use tree::MembershipTree;
pub use types::{Operation, SortAlgorithm, SortCriterion, Task, ValidationError};
pub use worker::{StoreWorker, WorkerConfig, WorkerHandle};
