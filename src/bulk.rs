//! Bulk deletion driven by a membership set.
//!
//! Each bulk operation first computes candidate keys into a
//! [`MembershipTree`], then retains every stored task whose key is a member
//! and removes those through the normal history-recording path.

use crate::store::{StoreError, TaskStore};
use crate::tree::MembershipTree;
use crate::types::Task;
use eyre::Result;

/// Extension trait for bulk operations on TaskStore.
pub trait StoreBulkExt {
    /// Remove every task whose title contains `text` (case-sensitive).
    /// An empty `text` is contained in every title.
    fn bulk_delete_by_name_substring(&mut self, text: &str) -> Result<usize>;

    /// Remove every task with `lo <= priority <= hi`. Fails before touching
    /// the store when `lo > hi`.
    fn bulk_delete_by_priority_range(&mut self, lo: u32, hi: u32) -> Result<usize>;
}

impl StoreBulkExt for TaskStore {
    fn bulk_delete_by_name_substring(&mut self, text: &str) -> Result<usize> {
        let removed = delete_members(self, |task| task.title.clone(), |task| task.title.contains(text))?;
        log::info!("Bulk deleted {} tasks matching {:?}", removed, text);
        Ok(removed)
    }

    fn bulk_delete_by_priority_range(&mut self, lo: u32, hi: u32) -> Result<usize> {
        if lo > hi {
            log::warn!("Rejected priority range {}..={}", lo, hi);
            return Err(eyre::eyre!(StoreError::InvalidRange { lo, hi }));
        }

        let removed = delete_members(
            self,
            |task| task.priority.to_string(),
            |task| (lo..=hi).contains(&task.priority),
        )?;
        log::info!("Bulk deleted {} tasks with priority in {}..={}", removed, lo, hi);
        Ok(removed)
    }
}

/// Build a membership set from the keys of tasks passing `candidate`.
pub fn collect_members<'a, K, P>(tasks: impl IntoIterator<Item = &'a Task>, member_key: K, candidate: P) -> MembershipTree
where
    K: Fn(&Task) -> String,
    P: Fn(&Task) -> bool,
{
    tasks
        .into_iter()
        .filter(|task| candidate(task))
        .map(|task| member_key(task))
        .collect()
}

fn delete_members<K, P>(store: &mut TaskStore, member_key: K, candidate: P) -> Result<usize>
where
    K: Fn(&Task) -> String,
    P: Fn(&Task) -> bool,
{
    let members = collect_members(store.iter(), &member_key, candidate);
    if members.is_empty() {
        return Ok(0);
    }

    let doomed: Vec<Task> = store
        .iter()
        .filter(|task| members.contains(&member_key(task)))
        .cloned()
        .collect();

    let mut removed = 0;
    for task in &doomed {
        if store.remove_task(task)? {
            removed += 1;
        }
    }
    Ok(removed)
}
