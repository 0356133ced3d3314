//! Core data types for the task store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Display format for due dates.
const DUE_DATE_FORMAT: &str = "%m/%d/%Y";

/// A single stored task. The title is its key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Task {
    /// Unique key, never changed after creation
    pub title: String,

    /// Freeform longer text
    #[serde(default)]
    pub description: String,

    /// Priority, 1 or higher
    pub priority: u32,

    /// Calendar date the task is due
    pub due_date: NaiveDate,
}

impl Task {
    /// Create a task with an empty description.
    pub fn new(title: impl Into<String>, priority: u32, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority,
            due_date,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The lookup key for this task.
    pub fn key(&self) -> &str {
        &self.title
    }

    /// Validate the task's fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.title.chars().any(|c| c.is_control()) {
            return Err(ValidationError::InvalidCharacters);
        }
        if self.priority == 0 {
            return Err(ValidationError::InvalidPriority);
        }
        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Priority: {} - Due: {}",
            self.title,
            self.priority,
            self.due_date.format(DUE_DATE_FORMAT)
        )
    }
}

/// Kind of structural mutation tracked by the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add"),
            Operation::Remove => write!(f, "remove"),
        }
    }
}

/// Field a sort is ordered by. Both orders are ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    Priority,
    DueDate,
}

impl SortCriterion {
    /// Compare two tasks under this criterion.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortCriterion::Priority => a.priority.cmp(&b.priority),
            SortCriterion::DueDate => a.due_date.cmp(&b.due_date),
        }
    }
}

/// Sorting routine used to reorder the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    /// Lomuto quicksort, not stable
    Quick,
    /// Top-down merge sort, stable
    #[default]
    Merge,
}

/// Validation errors for tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    InvalidCharacters,
    InvalidPriority,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "title cannot be empty"),
            ValidationError::InvalidCharacters => write!(f, "title contains control characters"),
            ValidationError::InvalidPriority => write!(f, "priority must be 1 or higher"),
        }
    }
}

impl std::error::Error for ValidationError {}
