//! Undo/redo log of structural mutations.

use crate::types::Operation;

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry<T> {
    /// The value that was added or removed
    pub value: T,

    /// What happened to it
    pub operation: Operation,

    /// Sequence position at the time of the mutation
    pub position: usize,
}

/// Two-stack history. Entries only ever move between the stacks once recorded.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo_stack: Vec<HistoryEntry<T>>,
    redo_stack: Vec<HistoryEntry<T>>,
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Record a fresh user mutation. Any pending redo entries are discarded.
    pub fn record(&mut self, operation: Operation, value: T, position: usize) {
        self.undo_stack.push(HistoryEntry {
            value,
            operation,
            position,
        });
        self.redo_stack.clear();
    }

    /// Move the most recent entry to the redo stack and return it.
    pub fn undo(&mut self) -> Option<HistoryEntry<T>> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Move the most recently undone entry back to the undo stack and return it.
    pub fn redo(&mut self) -> Option<HistoryEntry<T>> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    #[cfg(test)]
    fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
