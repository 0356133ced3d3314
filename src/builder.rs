//! Builder pattern API for adding tasks.

use crate::store::TaskStore;
use crate::types::Task;
use chrono::{Local, NaiveDate};
use eyre::{Context, Result};

/// Default priority for new tasks.
pub const DEFAULT_PRIORITY: u32 = 1;

/// Builder for adding tasks with a fluent API.
///
/// # Example
///
/// ```ignore
/// let task = store.build("Renew passport")
///     .priority(2)
///     .due(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap())
///     .description("Bring two photos")
///     .add()?;
/// ```
pub struct TaskBuilder<'a> {
    store: &'a mut TaskStore,
    title: String,
    description: String,
    priority: u32,
    due_date: Option<NaiveDate>,
}

impl<'a> TaskBuilder<'a> {
    /// Create a new builder with the given title.
    pub fn new(store: &'a mut TaskStore, title: impl Into<String>) -> Self {
        Self {
            store,
            title: title.into(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            due_date: None,
        }
    }

    /// Set the priority (1 or higher).
    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the due date (default: today).
    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add the task to the store and return a copy of it.
    pub fn add(self) -> Result<Task> {
        let due_date = self.due_date.unwrap_or_else(|| Local::now().date_naive());
        let task = Task::new(self.title, self.priority, due_date).with_description(self.description);

        self.store.add_task(task.clone()).context("Failed to add task")?;
        Ok(task)
    }
}

/// Extension trait to add builder method to TaskStore.
pub trait StoreBuilderExt {
    /// Start building a new task with the given title.
    fn build(&mut self, title: impl Into<String>) -> TaskBuilder<'_>;
}

impl StoreBuilderExt for TaskStore {
    fn build(&mut self, title: impl Into<String>) -> TaskBuilder<'_> {
        TaskBuilder::new(self, title)
    }
}
