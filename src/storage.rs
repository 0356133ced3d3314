//! Snapshot persistence: the whole task list as one JSON document.
//!
//! Saves go to a sibling temp file that is synced and renamed over the
//! target, so readers see either the old snapshot or the new one.

use crate::store::StoreError;
use crate::types::Task;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default snapshot file name.
pub const DEFAULT_DATA_FILE: &str = "tasks.dat";

/// Current snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

/// Suffix of the temp file written before the atomic rename.
const TEMP_SUFFIX: &str = "tmp";

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    tasks: Vec<&'a Task>,
}

#[derive(Deserialize)]
struct SnapshotIn {
    version: u32,
    tasks: Vec<Task>,
}

/// Write `tasks` to `path`, replacing any existing file.
pub fn write_snapshot<'a>(path: &Path, tasks: impl IntoIterator<Item = &'a Task>) -> Result<(), StoreError> {
    let snapshot = SnapshotOut {
        version: SNAPSHOT_VERSION,
        tasks: tasks.into_iter().collect(),
    };
    let json = serde_json::to_vec_pretty(&snapshot).map_err(|e| format_error(path, e))?;

    let temp_path = temp_path_for(path)?;
    if let Err(e) = write_and_sync(&temp_path, &json).and_then(|()| fs::rename(&temp_path, path)) {
        fs::remove_file(&temp_path).ok();
        return Err(io_error(path, e));
    }

    log::debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}

/// Read and validate the snapshot at `path`.
///
/// Missing or unreadable files yield [`StoreError::Io`]; anything that is
/// not a well-formed task list yields [`StoreError::Format`].
pub fn read_snapshot(path: &Path) -> Result<Vec<Task>, StoreError> {
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    let snapshot: SnapshotIn = serde_json::from_slice(&bytes).map_err(|e| format_error(path, e))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(format_error(
            path,
            format!("unsupported snapshot version {}", snapshot.version),
        ));
    }

    let mut seen = HashSet::new();
    for (position, task) in snapshot.tasks.iter().enumerate() {
        task.validate()
            .map_err(|e| format_error(path, format!("task {} ({:?}): {}", position, task.title, e)))?;
        if !seen.insert(task.key()) {
            return Err(format_error(path, format!("duplicate task key {:?}", task.title)));
        }
    }

    Ok(snapshot.tasks)
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> Result<PathBuf, StoreError> {
    let file_name = path.file_name().ok_or_else(|| {
        io_error(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;

    let mut temp_name = file_name.to_os_string();
    temp_name.push(".");
    temp_name.push(TEMP_SUFFIX);
    Ok(path.with_file_name(temp_name))
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn format_error(path: &Path, reason: impl ToString) -> StoreError {
    StoreError::Format {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
