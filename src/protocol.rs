//! Request/response types for talking to a [`crate::StoreWorker`].

use crate::store::StoreError;
use crate::types::{Operation, SortAlgorithm, SortCriterion, Task};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Request sent from a handle to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Append a task.
    Add { task: Task },

    /// Remove the first task equal to this one.
    Remove { task: Task },

    /// Remove by position.
    RemoveAt { index: usize },

    /// Snapshot of every task.
    List,

    /// Point lookup by key.
    Find { key: String },

    /// Case-insensitive title search.
    Search { term: String },

    /// Reorder the store; `None` uses the configured algorithm.
    Sort {
        criterion: SortCriterion,
        algorithm: Option<SortAlgorithm>,
    },

    Undo,

    Redo,

    /// Bulk delete by title substring.
    BulkDeleteByName { text: String },

    /// Bulk delete by inclusive priority range.
    BulkDeleteByPriority { lo: u32, hi: u32 },

    /// Persist a snapshot.
    Save { path: PathBuf },

    /// Replace contents from a snapshot.
    Load { path: PathBuf },

    /// Stop the worker after replying.
    Shutdown,

    /// Liveness check.
    Ping,
}

/// Response sent from the worker back to a handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Single task response.
    Task { task: Task },

    /// Multiple tasks response.
    Tasks { tasks: Vec<Task> },

    /// No task with this key.
    NotFound { key: String },

    /// Whether a removal matched anything.
    Removed { removed: bool },

    /// Number of tasks affected.
    Count { count: usize },

    /// Operation undone or redone, if any.
    History { operation: Option<Operation> },

    /// Operation succeeded.
    Ok,

    /// Pong response to ping.
    Pong,

    /// Error response.
    Error { kind: ErrorKind, message: String },
}

impl Response {
    /// Build an error response, keeping the store error category.
    pub fn error(report: &eyre::Report) -> Self {
        Self::Error {
            kind: ErrorKind::of(report),
            message: format!("{:#}", report),
        }
    }
}

/// Category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    OutOfRange,
    InvalidRange,
    DuplicateKey,
    Validation,
    Io,
    Format,
    InvalidConfig,
    Other,
}

impl ErrorKind {
    /// Classify a report by the [`StoreError`] it carries.
    pub fn of(report: &eyre::Report) -> Self {
        match report.downcast_ref::<StoreError>() {
            Some(StoreError::OutOfRange { .. }) => ErrorKind::OutOfRange,
            Some(StoreError::InvalidRange { .. }) => ErrorKind::InvalidRange,
            Some(StoreError::DuplicateKey(_)) => ErrorKind::DuplicateKey,
            Some(StoreError::Validation(_)) => ErrorKind::Validation,
            Some(StoreError::Io { .. }) => ErrorKind::Io,
            Some(StoreError::Format { .. }) => ErrorKind::Format,
            Some(StoreError::InvalidConfig(_)) => ErrorKind::InvalidConfig,
            None => ErrorKind::Other,
        }
    }
}

/// Error returned by a worker handle when the worker rejected a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerError {
    pub kind: ErrorKind,
    pub message: String,
}

impl std::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for WorkerError {}
