//! Background worker that serializes all access to a task store.
//!
//! The worker provides:
//! - Single-writer discipline (every request runs on one thread, in order)
//! - Off-thread persistence, so slow saves and loads never block callers
//! - Cloneable async handles for any number of producers

use crate::bulk::StoreBulkExt;
use crate::protocol::{Request, Response, WorkerError};
use crate::store::TaskStore;
use crate::types::{Operation, SortAlgorithm, SortCriterion, Task};
use eyre::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Default request queue depth.
const DEFAULT_QUEUE_DEPTH: usize = 100;

type Envelope = (Request, oneshot::Sender<Response>);

/// Configuration for the worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Requests that may wait before senders start to block
    pub queue_depth: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl WorkerConfig {
    /// Create config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the queue depth (at least one).
    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth.max(1);
        self
    }
}

/// Owns a [`TaskStore`] and applies requests one at a time.
pub struct StoreWorker {
    store: TaskStore,
    rx: mpsc::Receiver<Envelope>,
}

impl StoreWorker {
    /// Move `store` onto a blocking worker thread. Must be called inside a
    /// tokio runtime. The join handle yields the store back after shutdown.
    pub fn spawn(store: TaskStore, config: WorkerConfig) -> (WorkerHandle, JoinHandle<TaskStore>) {
        let (tx, rx) = mpsc::channel(config.queue_depth.max(1));
        let worker = Self { store, rx };
        let join = tokio::task::spawn_blocking(move || worker.run());
        (WorkerHandle { tx }, join)
    }

    /// Run until shutdown or until every handle is dropped.
    fn run(mut self) -> TaskStore {
        log::info!("Worker started with {} tasks", self.store.len());

        while let Some((request, reply)) = self.rx.blocking_recv() {
            let is_shutdown = matches!(request, Request::Shutdown);
            let response = self.handle_request(request);
            if reply.send(response).is_err() {
                log::warn!("Requester went away before the reply was sent");
            }
            if is_shutdown {
                break;
            }
        }

        log::info!("Worker shutting down");
        self.store
    }

    /// Handle a single request.
    fn handle_request(&mut self, request: Request) -> Response {
        let store = &mut self.store;
        let result = match request {
            Request::Add { task } => store.add_task(task).map(|()| Response::Ok),
            Request::Remove { task } => store.remove_task(&task).map(|removed| Response::Removed { removed }),
            Request::RemoveAt { index } => store.remove_at(index).map(|task| Response::Task { task }),
            Request::List => Ok(Response::Tasks { tasks: store.tasks() }),
            Request::Find { key } => Ok(match store.find_by_key(&key) {
                Some(task) => Response::Task { task },
                None => Response::NotFound { key },
            }),
            Request::Search { term } => Ok(Response::Tasks {
                tasks: store.search_by_title(&term),
            }),
            Request::Sort { criterion, algorithm } => {
                let algorithm = algorithm.unwrap_or(store.config().sort_algorithm);
                store.sort_with(criterion, algorithm);
                Ok(Response::Ok)
            }
            Request::Undo => store.undo().map(|operation| Response::History { operation }),
            Request::Redo => store.redo().map(|operation| Response::History { operation }),
            Request::BulkDeleteByName { text } => store
                .bulk_delete_by_name_substring(&text)
                .map(|count| Response::Count { count }),
            Request::BulkDeleteByPriority { lo, hi } => store
                .bulk_delete_by_priority_range(lo, hi)
                .map(|count| Response::Count { count }),
            Request::Save { path } => store.save_to_file(&path).map(|()| Response::Ok),
            Request::Load { path } => store.load_from_file(&path).map(|()| Response::Ok),
            Request::Shutdown => Ok(Response::Ok),
            Request::Ping => Ok(Response::Pong),
        };

        result.unwrap_or_else(|e| {
            log::warn!("Request failed: {:#}", e);
            Response::error(&e)
        })
    }
}

/// Cloneable async handle to a running [`StoreWorker`].
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WorkerHandle {
    /// Send a request and wait for its response.
    async fn request(&self, request: Request) -> Result<Response> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send((request, reply_tx)).await.is_err() {
            bail!("Worker is not running");
        }

        let response = reply_rx.await.context("Worker dropped the request")?;
        match response {
            Response::Error { kind, message } => Err(eyre::eyre!(WorkerError { kind, message })),
            other => Ok(other),
        }
    }

    /// Append a task.
    pub async fn add(&self, task: Task) -> Result<()> {
        match self.request(Request::Add { task }).await? {
            Response::Ok => Ok(()),
            _ => bail!("Unexpected response"),
        }
    }

    /// Remove the first task equal to `task`.
    pub async fn remove(&self, task: Task) -> Result<bool> {
        match self.request(Request::Remove { task }).await? {
            Response::Removed { removed } => Ok(removed),
            _ => bail!("Unexpected response"),
        }
    }

    /// Remove the task at `index`.
    pub async fn remove_at(&self, index: usize) -> Result<Task> {
        match self.request(Request::RemoveAt { index }).await? {
            Response::Task { task } => Ok(task),
            _ => bail!("Unexpected response"),
        }
    }

    /// Snapshot of all tasks.
    pub async fn list(&self) -> Result<Vec<Task>> {
        match self.request(Request::List).await? {
            Response::Tasks { tasks } => Ok(tasks),
            _ => bail!("Unexpected response"),
        }
    }

    /// Look up a task by key.
    pub async fn find(&self, key: &str) -> Result<Option<Task>> {
        match self.request(Request::Find { key: key.to_string() }).await? {
            Response::Task { task } => Ok(Some(task)),
            Response::NotFound { .. } => Ok(None),
            _ => bail!("Unexpected response"),
        }
    }

    /// Case-insensitive title search.
    pub async fn search(&self, term: &str) -> Result<Vec<Task>> {
        match self.request(Request::Search { term: term.to_string() }).await? {
            Response::Tasks { tasks } => Ok(tasks),
            _ => bail!("Unexpected response"),
        }
    }

    /// Sort with the worker store's configured algorithm.
    pub async fn sort(&self, criterion: SortCriterion) -> Result<()> {
        self.sort_with(criterion, None).await
    }

    /// Sort with an explicit algorithm.
    pub async fn sort_with(&self, criterion: SortCriterion, algorithm: Option<SortAlgorithm>) -> Result<()> {
        match self.request(Request::Sort { criterion, algorithm }).await? {
            Response::Ok => Ok(()),
            _ => bail!("Unexpected response"),
        }
    }

    pub async fn undo(&self) -> Result<Option<Operation>> {
        match self.request(Request::Undo).await? {
            Response::History { operation } => Ok(operation),
            _ => bail!("Unexpected response"),
        }
    }

    pub async fn redo(&self) -> Result<Option<Operation>> {
        match self.request(Request::Redo).await? {
            Response::History { operation } => Ok(operation),
            _ => bail!("Unexpected response"),
        }
    }

    /// Bulk delete by title substring.
    pub async fn bulk_delete_by_name(&self, text: &str) -> Result<usize> {
        match self.request(Request::BulkDeleteByName { text: text.to_string() }).await? {
            Response::Count { count } => Ok(count),
            _ => bail!("Unexpected response"),
        }
    }

    /// Bulk delete by inclusive priority range.
    pub async fn bulk_delete_by_priority(&self, lo: u32, hi: u32) -> Result<usize> {
        match self.request(Request::BulkDeleteByPriority { lo, hi }).await? {
            Response::Count { count } => Ok(count),
            _ => bail!("Unexpected response"),
        }
    }

    /// Save a snapshot; resolves once the file is fully written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        match self.request(Request::Save { path: PathBuf::from(path) }).await? {
            Response::Ok => Ok(()),
            _ => bail!("Unexpected response"),
        }
    }

    /// Load a snapshot; resolves once the store contents are replaced.
    pub async fn load(&self, path: &Path) -> Result<()> {
        match self.request(Request::Load { path: PathBuf::from(path) }).await? {
            Response::Ok => Ok(()),
            _ => bail!("Unexpected response"),
        }
    }

    /// Ping the worker.
    pub async fn ping(&self) -> Result<()> {
        match self.request(Request::Ping).await? {
            Response::Pong => Ok(()),
            _ => bail!("Unexpected response"),
        }
    }

    /// Stop the worker after all earlier requests complete.
    pub async fn shutdown(&self) -> Result<()> {
        match self.request(Request::Shutdown).await? {
            Response::Ok => Ok(()),
            _ => bail!("Unexpected response"),
        }
    }
}
