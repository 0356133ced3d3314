//! High-level store API: the orchestrator over list, index, cache and history.

use crate::cache::{BoundedCache, DEFAULT_CACHE_CAPACITY};
use crate::history::History;
use crate::index::{DEFAULT_BUCKETS, KeyIndex};
use crate::list::SeqList;
use crate::sort::{merge_sort, quick_sort};
use crate::storage;
use crate::types::{Operation, SortAlgorithm, SortCriterion, Task, ValidationError};
use eyre::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Position outside `[0, len)`.
    OutOfRange { index: usize, len: usize },
    /// Priority range with `lo > hi`.
    InvalidRange { lo: u32, hi: u32 },
    /// A task with this key is already stored.
    DuplicateKey(String),
    /// Task failed validation.
    Validation(ValidationError),
    /// Reading or writing a snapshot file failed.
    Io { path: PathBuf, source: std::io::Error },
    /// Snapshot contents are not a valid task list.
    Format { path: PathBuf, reason: String },
    /// Rejected configuration value.
    InvalidConfig(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::OutOfRange { index, len } => {
                write!(f, "index {} out of range for store of {} tasks", index, len)
            }
            StoreError::InvalidRange { lo, hi } => {
                write!(f, "invalid priority range {}..={}: start must not exceed end", lo, hi)
            }
            StoreError::DuplicateKey(key) => write!(f, "task already exists: {}", key),
            StoreError::Validation(e) => write!(f, "validation error: {}", e),
            StoreError::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            StoreError::Format { path, reason } => {
                write!(f, "malformed task file {}: {}", path.display(), reason)
            }
            StoreError::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Tunables for a [`TaskStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum entries kept in the lookup cache
    pub cache_capacity: usize,

    /// Fixed bucket count of the key index
    pub index_buckets: usize,

    /// Algorithm used by `sort_by`
    pub sort_algorithm: SortAlgorithm,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            index_buckets: DEFAULT_BUCKETS,
            sort_algorithm: SortAlgorithm::default(),
        }
    }
}

impl StoreConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the index bucket count.
    pub fn index_buckets(mut self, buckets: usize) -> Self {
        self.index_buckets = buckets;
        self
    }

    /// Set the default sort algorithm.
    pub fn sort_algorithm(mut self, algorithm: SortAlgorithm) -> Self {
        self.sort_algorithm = algorithm;
        self
    }
}

/// The task store.
///
/// Not internally synchronized: all mutations take `&mut self`. Share it
/// across threads through [`crate::StoreWorker`] or an outer mutex.
pub struct TaskStore {
    config: StoreConfig,
    tasks: SeqList<Arc<Task>>,
    index: KeyIndex<Arc<Task>>,
    cache: BoundedCache<Arc<Task>>,
    history: History<Arc<Task>>,
}

impl TaskStore {
    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let cache = BoundedCache::new(config.cache_capacity)?;
        let index = KeyIndex::with_buckets(config.index_buckets);

        Ok(Self {
            config,
            tasks: SeqList::new(),
            index,
            cache,
            history: History::new(),
        })
    }

    /// Create an empty store and fill it from a snapshot file.
    pub fn open(path: &Path, config: StoreConfig) -> Result<Self> {
        let mut store = Self::new(config)?;
        store.load_from_file(path)?;
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Borrow the task at `index`.
    pub fn get(&self, index: usize) -> Result<&Task> {
        Ok(self.tasks.get(index)?.as_ref())
    }

    /// Iterate tasks in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().map(|task| task.as_ref())
    }

    /// Snapshot of all tasks in store order.
    pub fn tasks(&self) -> Vec<Task> {
        self.iter().cloned().collect()
    }

    /// Append a task.
    pub fn add_task(&mut self, task: Task) -> Result<()> {
        if let Err(e) = task.validate() {
            log::warn!("Rejected task {:?}: {}", task.title, e);
            return Err(eyre::eyre!(StoreError::Validation(e)));
        }
        if self.index.contains_key(task.key()) {
            log::warn!("Rejected duplicate task {:?}", task.title);
            return Err(eyre::eyre!(StoreError::DuplicateKey(task.title)));
        }

        let task = Arc::new(task);
        let position = self.tasks.len();
        self.tasks.push(Arc::clone(&task));
        self.index.put(task.key(), Arc::clone(&task));
        self.cache.put(task.key(), Arc::clone(&task));
        log::debug!("Added {:?} at {}", task.title, position);
        self.history.record(Operation::Add, task, position);

        Ok(())
    }

    /// Remove the first task equal to `task`. Returns false if none matched.
    pub fn remove_task(&mut self, task: &Task) -> Result<bool> {
        match self.tasks.position(|t| t.as_ref() == task) {
            Some(position) => {
                self.remove_at(position)?;
                Ok(true)
            }
            None => {
                log::debug!("Remove of absent task {:?} ignored", task.title);
                Ok(false)
            }
        }
    }

    /// Remove the task at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Task> {
        let removed = self.unlink(index)?;
        self.history.record(Operation::Remove, Arc::clone(&removed), index);
        Ok(removed.as_ref().clone())
    }

    /// Look up a task by key, consulting the cache first.
    pub fn find_by_key(&mut self, key: &str) -> Option<Task> {
        if let Some(task) = self.cache.get(key) {
            return Some(task.as_ref().clone());
        }

        let task = Arc::clone(self.index.get(key)?);
        self.cache.put(key, Arc::clone(&task));
        Some(task.as_ref().clone())
    }

    /// True if `key` is currently held in the lookup cache.
    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    /// Tasks whose title contains `term`, ignoring case, ordered by title
    /// ignoring case. Does not change the store.
    pub fn search_by_title(&self, term: &str) -> Vec<Task> {
        let needle = term.to_lowercase();
        let mut matches: Vec<Task> = self
            .iter()
            .filter(|task| task.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        merge_sort(&mut matches, |a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        matches
    }

    /// Sort by ascending priority with the configured algorithm.
    pub fn sort_by_priority(&mut self) {
        self.sort_by(SortCriterion::Priority);
    }

    /// Sort by ascending due date with the configured algorithm.
    pub fn sort_by_due_date(&mut self) {
        self.sort_by(SortCriterion::DueDate);
    }

    pub fn sort_by(&mut self, criterion: SortCriterion) {
        self.sort_with(criterion, self.config.sort_algorithm);
    }

    /// Reorder the store with an explicit algorithm and rebuild the index.
    pub fn sort_with(&mut self, criterion: SortCriterion, algorithm: SortAlgorithm) {
        if self.tasks.is_empty() {
            return;
        }

        let mut snapshot: Vec<Arc<Task>> = self.tasks.iter().cloned().collect();
        let cmp = |a: &Arc<Task>, b: &Arc<Task>| criterion.compare(a, b);
        match algorithm {
            SortAlgorithm::Quick => quick_sort(&mut snapshot, cmp),
            SortAlgorithm::Merge => merge_sort(&mut snapshot, cmp),
        }

        self.tasks = snapshot.into_iter().collect();
        self.rebuild_index();
        log::debug!("Sorted {} tasks by {:?} using {:?}", self.tasks.len(), criterion, algorithm);
    }

    /// Revert the most recent mutation. Returns the operation that was undone.
    pub fn undo(&mut self) -> Result<Option<Operation>> {
        let Some(entry) = self.history.undo() else {
            log::debug!("Nothing to undo");
            return Ok(None);
        };

        match entry.operation {
            Operation::Add => {
                if let Some(position) = self.locate(&entry.value, entry.position) {
                    self.unlink(position)?;
                }
            }
            Operation::Remove => {
                let position = entry.position.min(self.tasks.len());
                self.link(position, entry.value)?;
            }
        }

        log::debug!("Undid {}", entry.operation);
        Ok(Some(entry.operation))
    }

    /// Re-apply the most recently undone mutation.
    pub fn redo(&mut self) -> Result<Option<Operation>> {
        let Some(entry) = self.history.redo() else {
            log::debug!("Nothing to redo");
            return Ok(None);
        };

        match entry.operation {
            Operation::Add => {
                let position = entry.position.min(self.tasks.len());
                self.link(position, entry.value)?;
            }
            Operation::Remove => {
                if let Some(position) = self.locate(&entry.value, entry.position) {
                    self.unlink(position)?;
                }
            }
        }

        log::debug!("Redid {}", entry.operation);
        Ok(Some(entry.operation))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Write every task to `path`, replacing the file atomically.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        storage::write_snapshot(path, self.iter())?;
        log::info!("Saved {} tasks to {}", self.tasks.len(), path.display());
        Ok(())
    }

    /// Replace the store contents with the snapshot at `path`.
    ///
    /// On error the current contents are left untouched. History is
    /// cleared on success.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let loaded = storage::read_snapshot(path)?;

        self.tasks = loaded.into_iter().map(Arc::new).collect();
        self.rebuild_index();
        self.cache.clear();
        self.history.clear();

        log::info!("Loaded {} tasks from {}", self.tasks.len(), path.display());
        Ok(())
    }

    /// Insert without recording history.
    fn link(&mut self, position: usize, task: Arc<Task>) -> Result<()> {
        self.tasks.insert(position, Arc::clone(&task))?;
        self.index.put(task.key().to_string(), task);
        self.cache.clear();
        Ok(())
    }

    /// Remove without recording history.
    fn unlink(&mut self, position: usize) -> Result<Arc<Task>> {
        let removed = self.tasks.remove(position)?;
        self.index.remove(removed.key());
        self.cache.clear();
        log::debug!("Removed {:?} from {}", removed.title, position);
        Ok(removed)
    }

    /// Position of `task`, preferring the recorded `hint` when it still matches.
    fn locate(&self, task: &Arc<Task>, hint: usize) -> Option<usize> {
        match self.tasks.get(hint) {
            Ok(found) if found == task => Some(hint),
            _ => self.tasks.rposition(|t| t == task),
        }
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for task in self.tasks.iter() {
            self.index.put(task.key(), Arc::clone(task));
        }
    }
}
